//! Repository traits and their in-memory implementations
//!
//! Point lookups return `Ok(None)` for a missing row; "not found" is a
//! business decision made by the caller.

pub mod appointment;
pub mod doctor;
pub mod filters;
pub mod medical_record;
mod memory;
pub mod patient;
pub mod postgres;
pub mod prescription;

pub use appointment::{AppointmentRepository, InMemoryAppointmentRepository};
pub use doctor::{DoctorRepository, InMemoryDoctorRepository};
pub use filters::*;
pub use medical_record::{InMemoryMedicalRecordRepository, MedicalRecordRepository};
pub use patient::{InMemoryPatientRepository, PatientRepository};
pub use prescription::{InMemoryPrescriptionRepository, PrescriptionRepository};
