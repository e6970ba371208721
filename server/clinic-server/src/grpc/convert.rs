//! Conversions between the generated protobuf messages and the shared
//! request/response types, plus the error to `Status` mapping.
//!
//! Enum fields travel as their integer codes. `0` is the proto default and
//! means "unspecified"; codes outside the enum are rejected.

use database_layer::{
    Address, AppointmentStatus, BloodGroup, ConsultationType, Gender, Medication, Specialization, VitalSigns,
};
use error_common::{ClinicError, ErrorKind};
use tonic::Status;

use super::proto;
use crate::types;

/// Maps a service error onto the gRPC status space
pub fn to_status(err: ClinicError) -> Status {
    let message = err.public_message();
    match err.kind() {
        ErrorKind::Validation => Status::invalid_argument(message),
        ErrorKind::NotFound => Status::not_found(message),
        ErrorKind::AlreadyExists | ErrorKind::Conflict => Status::already_exists(message),
        ErrorKind::InvalidTransition => Status::failed_precondition(message),
        ErrorKind::Storage => Status::internal(message),
    }
}

fn decode<T>(field: &str, code: i32, from_code: fn(i32) -> Option<T>) -> Result<T, Status> {
    from_code(code).ok_or_else(|| Status::invalid_argument(format!("{field} has unknown value {code}")))
}

/// Optional enum filter: absent and `0` both mean "no filter"
fn decode_filter<T>(field: &str, code: Option<i32>, from_code: fn(i32) -> Option<T>) -> Result<Option<T>, Status> {
    match code {
        None | Some(0) => Ok(None),
        Some(code) => decode(field, code, from_code).map(Some),
    }
}

// ----------------------------------------------------------------------------
// Value types
// ----------------------------------------------------------------------------

impl From<proto::Address> for Address {
    fn from(a: proto::Address) -> Self {
        Self {
            street: a.street,
            city: a.city,
            state: a.state,
            zip_code: a.zip_code,
            country: a.country,
        }
    }
}

impl From<Address> for proto::Address {
    fn from(a: Address) -> Self {
        Self {
            street: a.street,
            city: a.city,
            state: a.state,
            zip_code: a.zip_code,
            country: a.country,
        }
    }
}

impl From<proto::VitalSigns> for VitalSigns {
    fn from(v: proto::VitalSigns) -> Self {
        Self {
            temperature: v.temperature,
            blood_pressure: v.blood_pressure,
            heart_rate: v.heart_rate,
            respiratory_rate: v.respiratory_rate,
            oxygen_saturation: v.oxygen_saturation,
            weight: v.weight,
            height: v.height,
        }
    }
}

impl From<proto::Medication> for Medication {
    fn from(m: proto::Medication) -> Self {
        Self {
            medication_name: m.medication_name,
            dosage: m.dosage,
            frequency: m.frequency,
            duration: m.duration,
            route: m.route,
            instructions: m.instructions,
            quantity: m.quantity,
        }
    }
}

impl From<Medication> for proto::Medication {
    fn from(m: Medication) -> Self {
        Self {
            medication_name: m.medication_name,
            dosage: m.dosage,
            frequency: m.frequency,
            duration: m.duration,
            route: m.route,
            instructions: m.instructions,
            quantity: m.quantity,
        }
    }
}

impl From<types::AvailabilitySlot> for proto::AvailabilitySlot {
    fn from(s: types::AvailabilitySlot) -> Self {
        Self {
            day_of_week: s.day_of_week,
            start_time: s.start_time,
            end_time: s.end_time,
            slot_duration_minutes: s.slot_duration_minutes,
        }
    }
}

impl From<proto::AvailabilitySlot> for types::AvailabilitySlot {
    fn from(s: proto::AvailabilitySlot) -> Self {
        Self {
            day_of_week: s.day_of_week,
            start_time: s.start_time,
            end_time: s.end_time,
            slot_duration_minutes: s.slot_duration_minutes,
        }
    }
}

// ----------------------------------------------------------------------------
// Patients
// ----------------------------------------------------------------------------

impl TryFrom<proto::RegisterPatientRequest> for types::RegisterPatientRequest {
    type Error = Status;

    fn try_from(req: proto::RegisterPatientRequest) -> Result<Self, Status> {
        Ok(Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
            date_of_birth: req.date_of_birth,
            gender: decode("gender", req.gender, Gender::from_code)?,
            blood_group: decode("blood_group", req.blood_group, BloodGroup::from_code)?,
            address: req.address.map(Address::from),
        })
    }
}

impl TryFrom<proto::UpdatePatientRequest> for types::UpdatePatientRequest {
    type Error = Status;

    fn try_from(req: proto::UpdatePatientRequest) -> Result<Self, Status> {
        Ok(Self {
            first_name: req.first_name,
            last_name: req.last_name,
            date_of_birth: req.date_of_birth,
            gender: req.gender.map(|g| decode("gender", g, Gender::from_code)).transpose()?,
            blood_group: req
                .blood_group
                .map(|b| decode("blood_group", b, BloodGroup::from_code))
                .transpose()?,
            phone_number: req.phone_number,
            email: req.email,
            address: req.address.map(Address::from),
        })
    }
}

impl From<proto::SearchPatientsRequest> for types::SearchPatientsQuery {
    fn from(req: proto::SearchPatientsRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone_number: req.phone_number,
            patient_id: req.patient_id,
        }
    }
}

impl From<types::PatientResponse> for proto::PatientResponse {
    fn from(p: types::PatientResponse) -> Self {
        Self {
            patient_id: p.patient_id,
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            phone_number: p.phone_number,
            date_of_birth: p.date_of_birth,
            gender: p.gender.code(),
            blood_group: p.blood_group.code(),
            address: p.address.map(proto::Address::from),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<proto::AddMedicalRecordRequest> for types::AddMedicalRecordRequest {
    fn from(req: proto::AddMedicalRecordRequest) -> Self {
        Self {
            doctor_id: req.doctor_id,
            visit_date: req.visit_date,
            diagnosis: req.diagnosis,
            symptoms: req.symptoms,
            treatment: req.treatment,
            prescriptions: req.prescriptions,
            lab_results: req.lab_results,
            vital_signs: req.vital_signs.map(VitalSigns::from),
            notes: req.notes,
            follow_up_date: req.follow_up_date,
            record_type: req.record_type,
        }
    }
}

impl From<types::MedicalRecordSummary> for proto::MedicalRecord {
    fn from(r: types::MedicalRecordSummary) -> Self {
        Self {
            record_id: r.record_id,
            doctor_id: r.doctor_id,
            visit_date: r.visit_date,
            diagnosis: r.diagnosis,
            notes: r.notes,
        }
    }
}

impl From<types::MedicalHistoryResponse> for proto::MedicalHistoryResponse {
    fn from(h: types::MedicalHistoryResponse) -> Self {
        Self {
            patient_id: h.patient_id,
            records: h.records.into_iter().map(proto::MedicalRecord::from).collect(),
        }
    }
}

// ----------------------------------------------------------------------------
// Doctors
// ----------------------------------------------------------------------------

impl TryFrom<proto::RegisterDoctorRequest> for types::RegisterDoctorRequest {
    type Error = Status;

    fn try_from(req: proto::RegisterDoctorRequest) -> Result<Self, Status> {
        Ok(Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone_number: req.phone_number,
            specialization: decode("specialization", req.specialization, Specialization::from_code)?,
            license_number: req.license_number,
            years_of_experience: req.years_of_experience,
            qualifications: req.qualifications,
            languages: req.languages,
            consultation_fee: req.consultation_fee,
        })
    }
}

impl From<proto::UpdateDoctorRequest> for types::UpdateDoctorRequest {
    fn from(req: proto::UpdateDoctorRequest) -> Self {
        Self {
            phone_number: req.phone_number,
            email: req.email,
            consultation_fee: req.consultation_fee,
            is_available: req.is_available,
        }
    }
}

impl TryFrom<proto::SearchDoctorsRequest> for types::SearchDoctorsQuery {
    type Error = Status;

    fn try_from(req: proto::SearchDoctorsRequest) -> Result<Self, Status> {
        Ok(Self {
            name: req.name,
            specialization: decode_filter("specialization", req.specialization, Specialization::from_code)?,
            is_available: req.is_available,
        })
    }
}

impl From<types::DoctorResponse> for proto::DoctorResponse {
    fn from(d: types::DoctorResponse) -> Self {
        Self {
            doctor_id: d.doctor_id,
            first_name: d.first_name,
            last_name: d.last_name,
            email: d.email,
            phone_number: d.phone_number,
            specialization: d.specialization.code(),
            license_number: d.license_number,
            years_of_experience: d.years_of_experience,
            qualifications: d.qualifications,
            languages: d.languages,
            consultation_fee: d.consultation_fee,
            is_available: d.is_available,
            average_rating: d.average_rating,
            total_consultations: d.total_consultations,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl From<types::DoctorAvailabilityResponse> for proto::DoctorAvailabilityResponse {
    fn from(a: types::DoctorAvailabilityResponse) -> Self {
        Self {
            doctor_id: a.doctor_id,
            availability_slots: a
                .availability_slots
                .into_iter()
                .map(proto::AvailabilitySlot::from)
                .collect(),
        }
    }
}

// ----------------------------------------------------------------------------
// Appointments
// ----------------------------------------------------------------------------

impl TryFrom<proto::BookAppointmentRequest> for types::BookAppointmentRequest {
    type Error = Status;

    fn try_from(req: proto::BookAppointmentRequest) -> Result<Self, Status> {
        Ok(Self {
            patient_id: req.patient_id,
            doctor_id: req.doctor_id,
            appointment_date: req.appointment_date,
            appointment_time: req.appointment_time,
            consultation_type: decode(
                "consultation_type",
                req.consultation_type,
                ConsultationType::from_code,
            )?,
            reason_for_visit: req.reason_for_visit,
            notes: req.notes,
        })
    }
}

impl TryFrom<proto::GetPatientAppointmentsRequest> for types::PatientAppointmentsQuery {
    type Error = Status;

    fn try_from(req: proto::GetPatientAppointmentsRequest) -> Result<Self, Status> {
        Ok(Self {
            status: decode_filter("status", req.status, AppointmentStatus::from_code)?,
            from_date: req.from_date,
            to_date: req.to_date,
        })
    }
}

impl TryFrom<proto::GetDoctorAppointmentsRequest> for types::DoctorAppointmentsQuery {
    type Error = Status;

    fn try_from(req: proto::GetDoctorAppointmentsRequest) -> Result<Self, Status> {
        Ok(Self {
            status: decode_filter("status", req.status, AppointmentStatus::from_code)?,
            date: req.date,
        })
    }
}

impl From<types::AppointmentResponse> for proto::AppointmentResponse {
    fn from(a: types::AppointmentResponse) -> Self {
        Self {
            appointment_id: a.appointment_id,
            patient_id: a.patient_id,
            patient_name: a.patient_name,
            doctor_id: a.doctor_id,
            doctor_name: a.doctor_name,
            appointment_date: a.appointment_date,
            appointment_time: a.appointment_time,
            status: a.status.code(),
            consultation_type: a.consultation_type.code(),
            reason_for_visit: a.reason_for_visit,
            notes: a.notes,
            diagnosis: a.diagnosis,
            cancelled_at: a.cancelled_at,
            cancellation_reason: a.cancellation_reason,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

impl From<types::AvailableSlotsResponse> for proto::AvailableSlotsResponse {
    fn from(s: types::AvailableSlotsResponse) -> Self {
        Self {
            doctor_id: s.doctor_id,
            doctor_name: s.doctor_name,
            date: s.date,
            available_slots: s
                .available_slots
                .into_iter()
                .map(|slot| proto::TimeSlot {
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    is_available: slot.is_available,
                })
                .collect(),
        }
    }
}

pub fn appointments(items: Vec<types::AppointmentResponse>) -> proto::AppointmentsResponse {
    proto::AppointmentsResponse {
        appointments: items.into_iter().map(proto::AppointmentResponse::from).collect(),
    }
}

// ----------------------------------------------------------------------------
// Prescriptions
// ----------------------------------------------------------------------------

impl From<proto::CreatePrescriptionRequest> for types::CreatePrescriptionRequest {
    fn from(req: proto::CreatePrescriptionRequest) -> Self {
        Self {
            appointment_id: req.appointment_id,
            patient_id: req.patient_id,
            doctor_id: req.doctor_id,
            medications: req.medications.into_iter().map(Medication::from).collect(),
            diagnosis: req.diagnosis,
            additional_instructions: req.additional_instructions,
            validity_days: req.validity_days,
        }
    }
}

impl From<types::PrescriptionResponse> for proto::PrescriptionResponse {
    fn from(p: types::PrescriptionResponse) -> Self {
        Self {
            prescription_id: p.prescription_id,
            appointment_id: p.appointment_id,
            patient_id: p.patient_id,
            patient_name: p.patient_name,
            doctor_id: p.doctor_id,
            doctor_name: p.doctor_name,
            medications: p.medications.into_iter().map(proto::Medication::from).collect(),
            diagnosis: p.diagnosis,
            additional_instructions: p.additional_instructions,
            prescription_date: p.prescription_date,
            valid_until: p.valid_until,
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

pub fn prescriptions(items: Vec<types::PrescriptionResponse>) -> proto::PrescriptionsResponse {
    proto::PrescriptionsResponse {
        prescriptions: items.into_iter().map(proto::PrescriptionResponse::from).collect(),
    }
}

pub fn date_range(from_date: Option<String>, to_date: Option<String>) -> types::DateRangeQuery {
    types::DateRangeQuery { from_date, to_date }
}
