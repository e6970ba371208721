//! PostgreSQL-backed repositories
//!
//! Each repository reads into a private `*Row` struct mirroring the table and
//! converts it into the entity, decoding JSON text columns on the way.

mod appointment;
mod doctor;
mod medical_record;
mod patient;
mod prescription;

pub use appointment::PostgresAppointmentRepository;
pub use doctor::PostgresDoctorRepository;
pub use medical_record::PostgresMedicalRecordRepository;
pub use patient::PostgresPatientRepository;
pub use prescription::PostgresPrescriptionRepository;

use crate::error::DatabaseResult;

fn collect<R, T>(rows: Vec<R>) -> DatabaseResult<Vec<T>>
where
    T: TryFrom<R, Error = crate::error::DatabaseError>,
{
    rows.into_iter().map(T::try_from).collect()
}
