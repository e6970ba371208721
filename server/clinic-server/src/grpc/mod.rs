//! gRPC front end (`clinic.v1`), enabled with the `grpc` feature
//!
//! Each generated service trait is implemented over [`ClinicServer`] and
//! delegates to the same business services as the HTTP handlers.

pub mod convert;

use std::net::SocketAddr;

use logger_redacted::redacted_info;
use tonic::{transport::Server, Request, Response, Status};
use tracing::instrument;

use crate::server::ClinicServer;
use convert::to_status;

// Include the generated gRPC code
pub mod proto {
    tonic::include_proto!("clinic.v1");
}

use proto::{
    appointment_service_server::{AppointmentService, AppointmentServiceServer},
    doctor_service_server::{DoctorService, DoctorServiceServer},
    patient_service_server::{PatientService, PatientServiceServer},
    prescription_service_server::{PrescriptionService, PrescriptionServiceServer},
};

/// Serves all four services on `addr` until the task is dropped.
///
/// # Errors
///
/// Returns the transport error when the listener cannot be bound or fails.
pub async fn serve(server: ClinicServer, addr: SocketAddr) -> Result<(), tonic::transport::Error> {
    Server::builder()
        .add_service(PatientServiceServer::new(PatientGrpc::new(server.clone())))
        .add_service(DoctorServiceServer::new(DoctorGrpc::new(server.clone())))
        .add_service(AppointmentServiceServer::new(AppointmentGrpc::new(server.clone())))
        .add_service(PrescriptionServiceServer::new(PrescriptionGrpc::new(server)))
        .serve(addr)
        .await
}

// ============================================================================
// Patients
// ============================================================================

#[derive(Clone)]
pub struct PatientGrpc {
    server: ClinicServer,
}

impl PatientGrpc {
    pub fn new(server: ClinicServer) -> Self {
        Self { server }
    }
}

#[tonic::async_trait]
impl PatientService for PatientGrpc {
    #[instrument(name = "grpc.RegisterPatient", skip_all)]
    async fn register_patient(
        &self,
        request: Request<proto::RegisterPatientRequest>,
    ) -> Result<Response<proto::PatientResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC RegisterPatient request: email={} phone={}",
            req.email,
            req.phone_number
        );

        let patient = self
            .server
            .patients
            .register_patient(req.try_into()?)
            .await
            .map_err(to_status)?;
        Ok(Response::new(patient.into()))
    }

    #[instrument(name = "grpc.GetPatient", skip_all)]
    async fn get_patient(
        &self,
        request: Request<proto::GetPatientRequest>,
    ) -> Result<Response<proto::PatientResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(self.server.logger, "gRPC GetPatient request: patient_id={}", req.patient_id);

        let patient = self.server.patients.get_patient(&req.patient_id).await.map_err(to_status)?;
        Ok(Response::new(patient.into()))
    }

    #[instrument(name = "grpc.UpdatePatient", skip_all)]
    async fn update_patient(
        &self,
        request: Request<proto::UpdatePatientRequest>,
    ) -> Result<Response<proto::PatientResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(self.server.logger, "gRPC UpdatePatient request: patient_id={}", req.patient_id);

        let patient_id = req.patient_id.clone();
        let patient = self
            .server
            .patients
            .update_patient(&patient_id, req.try_into()?)
            .await
            .map_err(to_status)?;
        Ok(Response::new(patient.into()))
    }

    #[instrument(name = "grpc.SearchPatients", skip_all)]
    async fn search_patients(
        &self,
        request: Request<proto::SearchPatientsRequest>,
    ) -> Result<Response<proto::SearchPatientsResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC SearchPatients request: name={:?} email={:?} phone={:?}",
            req.name,
            req.email,
            req.phone_number
        );

        let patients = self
            .server
            .patients
            .search_patients(req.into())
            .await
            .map_err(to_status)?;
        Ok(Response::new(proto::SearchPatientsResponse {
            patients: patients.into_iter().map(proto::PatientResponse::from).collect(),
        }))
    }

    #[instrument(name = "grpc.GetMedicalHistory", skip_all)]
    async fn get_medical_history(
        &self,
        request: Request<proto::GetMedicalHistoryRequest>,
    ) -> Result<Response<proto::MedicalHistoryResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC GetMedicalHistory request: patient_id={}",
            req.patient_id
        );

        let history = self
            .server
            .patients
            .get_medical_history(&req.patient_id, convert::date_range(req.from_date, req.to_date))
            .await
            .map_err(to_status)?;
        Ok(Response::new(history.into()))
    }

    #[instrument(name = "grpc.AddMedicalRecord", skip_all)]
    async fn add_medical_record(
        &self,
        request: Request<proto::AddMedicalRecordRequest>,
    ) -> Result<Response<proto::MedicalRecord>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC AddMedicalRecord request: patient_id={} doctor_id={}",
            req.patient_id,
            req.doctor_id
        );

        let patient_id = req.patient_id.clone();
        let record = self
            .server
            .patients
            .add_medical_record(&patient_id, req.into())
            .await
            .map_err(to_status)?;
        Ok(Response::new(record.into()))
    }
}

// ============================================================================
// Doctors
// ============================================================================

#[derive(Clone)]
pub struct DoctorGrpc {
    server: ClinicServer,
}

impl DoctorGrpc {
    pub fn new(server: ClinicServer) -> Self {
        Self { server }
    }
}

#[tonic::async_trait]
impl DoctorService for DoctorGrpc {
    #[instrument(name = "grpc.RegisterDoctor", skip_all)]
    async fn register_doctor(
        &self,
        request: Request<proto::RegisterDoctorRequest>,
    ) -> Result<Response<proto::DoctorResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC RegisterDoctor request: email={} license={}",
            req.email,
            req.license_number
        );

        let doctor = self
            .server
            .doctors
            .register_doctor(req.try_into()?)
            .await
            .map_err(to_status)?;
        Ok(Response::new(doctor.into()))
    }

    #[instrument(name = "grpc.GetDoctor", skip_all)]
    async fn get_doctor(
        &self,
        request: Request<proto::GetDoctorRequest>,
    ) -> Result<Response<proto::DoctorResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(self.server.logger, "gRPC GetDoctor request: doctor_id={}", req.doctor_id);

        let doctor = self.server.doctors.get_doctor(&req.doctor_id).await.map_err(to_status)?;
        Ok(Response::new(doctor.into()))
    }

    #[instrument(name = "grpc.UpdateDoctor", skip_all)]
    async fn update_doctor(
        &self,
        request: Request<proto::UpdateDoctorRequest>,
    ) -> Result<Response<proto::DoctorResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(self.server.logger, "gRPC UpdateDoctor request: doctor_id={}", req.doctor_id);

        let doctor_id = req.doctor_id.clone();
        let doctor = self
            .server
            .doctors
            .update_doctor(&doctor_id, req.into())
            .await
            .map_err(to_status)?;
        Ok(Response::new(doctor.into()))
    }

    #[instrument(name = "grpc.SearchDoctors", skip_all)]
    async fn search_doctors(
        &self,
        request: Request<proto::SearchDoctorsRequest>,
    ) -> Result<Response<proto::SearchDoctorsResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC SearchDoctors request: name={:?} specialization={:?}",
            req.name,
            req.specialization
        );

        let doctors = self
            .server
            .doctors
            .search_doctors(req.try_into()?)
            .await
            .map_err(to_status)?;
        Ok(Response::new(proto::SearchDoctorsResponse {
            doctors: doctors.into_iter().map(proto::DoctorResponse::from).collect(),
        }))
    }

    #[instrument(name = "grpc.SetAvailability", skip_all)]
    async fn set_availability(
        &self,
        request: Request<proto::SetAvailabilityRequest>,
    ) -> Result<Response<proto::DoctorAvailabilityResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC SetAvailability request: doctor_id={} windows={}",
            req.doctor_id,
            req.availability_slots.len()
        );

        let update = crate::types::SetAvailabilityRequest {
            availability_slots: req.availability_slots.into_iter().map(Into::into).collect(),
        };
        let availability = self
            .server
            .doctors
            .set_availability(&req.doctor_id, update)
            .await
            .map_err(to_status)?;
        Ok(Response::new(availability.into()))
    }

    #[instrument(name = "grpc.GetDoctorAvailability", skip_all)]
    async fn get_doctor_availability(
        &self,
        request: Request<proto::GetDoctorAvailabilityRequest>,
    ) -> Result<Response<proto::DoctorAvailabilityResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC GetDoctorAvailability request: doctor_id={}",
            req.doctor_id
        );

        let availability = self
            .server
            .doctors
            .get_availability(&req.doctor_id)
            .await
            .map_err(to_status)?;
        Ok(Response::new(availability.into()))
    }
}

// ============================================================================
// Appointments
// ============================================================================

#[derive(Clone)]
pub struct AppointmentGrpc {
    server: ClinicServer,
}

impl AppointmentGrpc {
    pub fn new(server: ClinicServer) -> Self {
        Self { server }
    }
}

#[tonic::async_trait]
impl AppointmentService for AppointmentGrpc {
    #[instrument(name = "grpc.BookAppointment", skip_all)]
    async fn book_appointment(
        &self,
        request: Request<proto::BookAppointmentRequest>,
    ) -> Result<Response<proto::AppointmentResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC BookAppointment request: patient_id={} doctor_id={} slot={} {}",
            req.patient_id,
            req.doctor_id,
            req.appointment_date,
            req.appointment_time
        );

        let appointment = self
            .server
            .appointments
            .book_appointment(req.try_into()?)
            .await
            .map_err(to_status)?;
        Ok(Response::new(appointment.into()))
    }

    #[instrument(name = "grpc.GetAppointment", skip_all)]
    async fn get_appointment(
        &self,
        request: Request<proto::GetAppointmentRequest>,
    ) -> Result<Response<proto::AppointmentResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC GetAppointment request: appointment_id={}",
            req.appointment_id
        );

        let appointment = self
            .server
            .appointments
            .get_appointment(&req.appointment_id)
            .await
            .map_err(to_status)?;
        Ok(Response::new(appointment.into()))
    }

    #[instrument(name = "grpc.CancelAppointment", skip_all)]
    async fn cancel_appointment(
        &self,
        request: Request<proto::CancelAppointmentRequest>,
    ) -> Result<Response<proto::AppointmentResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC CancelAppointment request: appointment_id={}",
            req.appointment_id
        );

        let cancel = crate::types::CancelAppointmentRequest { reason: req.reason };
        let appointment = self
            .server
            .appointments
            .cancel_appointment(&req.appointment_id, cancel)
            .await
            .map_err(to_status)?;
        Ok(Response::new(appointment.into()))
    }

    #[instrument(name = "grpc.RescheduleAppointment", skip_all)]
    async fn reschedule_appointment(
        &self,
        request: Request<proto::RescheduleAppointmentRequest>,
    ) -> Result<Response<proto::AppointmentResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC RescheduleAppointment request: appointment_id={} new_slot={} {}",
            req.appointment_id,
            req.new_appointment_date,
            req.new_appointment_time
        );

        let reschedule = crate::types::RescheduleAppointmentRequest {
            new_appointment_date: req.new_appointment_date,
            new_appointment_time: req.new_appointment_time,
            reason: req.reason,
        };
        let appointment = self
            .server
            .appointments
            .reschedule_appointment(&req.appointment_id, reschedule)
            .await
            .map_err(to_status)?;
        Ok(Response::new(appointment.into()))
    }

    #[instrument(name = "grpc.CompleteAppointment", skip_all)]
    async fn complete_appointment(
        &self,
        request: Request<proto::CompleteAppointmentRequest>,
    ) -> Result<Response<proto::AppointmentResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC CompleteAppointment request: appointment_id={}",
            req.appointment_id
        );

        let complete = crate::types::CompleteAppointmentRequest {
            diagnosis: req.diagnosis,
            notes: req.notes,
        };
        let appointment = self
            .server
            .appointments
            .complete_appointment(&req.appointment_id, complete)
            .await
            .map_err(to_status)?;
        Ok(Response::new(appointment.into()))
    }

    #[instrument(name = "grpc.GetAvailableSlots", skip_all)]
    async fn get_available_slots(
        &self,
        request: Request<proto::GetAvailableSlotsRequest>,
    ) -> Result<Response<proto::AvailableSlotsResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC GetAvailableSlots request: doctor_id={} date={}",
            req.doctor_id,
            req.date
        );

        let slots = self
            .server
            .appointments
            .get_available_slots(&req.doctor_id, &req.date)
            .await
            .map_err(to_status)?;
        Ok(Response::new(slots.into()))
    }

    #[instrument(name = "grpc.GetPatientAppointments", skip_all)]
    async fn get_patient_appointments(
        &self,
        request: Request<proto::GetPatientAppointmentsRequest>,
    ) -> Result<Response<proto::AppointmentsResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC GetPatientAppointments request: patient_id={}",
            req.patient_id
        );

        let patient_id = req.patient_id.clone();
        let appointments = self
            .server
            .appointments
            .get_patient_appointments(&patient_id, req.try_into()?)
            .await
            .map_err(to_status)?;
        Ok(Response::new(convert::appointments(appointments)))
    }

    #[instrument(name = "grpc.GetDoctorAppointments", skip_all)]
    async fn get_doctor_appointments(
        &self,
        request: Request<proto::GetDoctorAppointmentsRequest>,
    ) -> Result<Response<proto::AppointmentsResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC GetDoctorAppointments request: doctor_id={}",
            req.doctor_id
        );

        let doctor_id = req.doctor_id.clone();
        let appointments = self
            .server
            .appointments
            .get_doctor_appointments(&doctor_id, req.try_into()?)
            .await
            .map_err(to_status)?;
        Ok(Response::new(convert::appointments(appointments)))
    }
}

// ============================================================================
// Prescriptions
// ============================================================================

#[derive(Clone)]
pub struct PrescriptionGrpc {
    server: ClinicServer,
}

impl PrescriptionGrpc {
    pub fn new(server: ClinicServer) -> Self {
        Self { server }
    }
}

#[tonic::async_trait]
impl PrescriptionService for PrescriptionGrpc {
    #[instrument(name = "grpc.CreatePrescription", skip_all)]
    async fn create_prescription(
        &self,
        request: Request<proto::CreatePrescriptionRequest>,
    ) -> Result<Response<proto::PrescriptionResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC CreatePrescription request: patient_id={} doctor_id={} medications={}",
            req.patient_id,
            req.doctor_id,
            req.medications.len()
        );

        let prescription = self
            .server
            .prescriptions
            .create_prescription(req.into())
            .await
            .map_err(to_status)?;
        Ok(Response::new(prescription.into()))
    }

    #[instrument(name = "grpc.GetPrescription", skip_all)]
    async fn get_prescription(
        &self,
        request: Request<proto::GetPrescriptionRequest>,
    ) -> Result<Response<proto::PrescriptionResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC GetPrescription request: prescription_id={}",
            req.prescription_id
        );

        let prescription = self
            .server
            .prescriptions
            .get_prescription(&req.prescription_id)
            .await
            .map_err(to_status)?;
        Ok(Response::new(prescription.into()))
    }

    #[instrument(name = "grpc.GetPatientPrescriptions", skip_all)]
    async fn get_patient_prescriptions(
        &self,
        request: Request<proto::GetPatientPrescriptionsRequest>,
    ) -> Result<Response<proto::PrescriptionsResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC GetPatientPrescriptions request: patient_id={}",
            req.patient_id
        );

        let prescriptions = self
            .server
            .prescriptions
            .get_patient_prescriptions(&req.patient_id, convert::date_range(req.from_date, req.to_date))
            .await
            .map_err(to_status)?;
        Ok(Response::new(convert::prescriptions(prescriptions)))
    }

    #[instrument(name = "grpc.GetDoctorPrescriptions", skip_all)]
    async fn get_doctor_prescriptions(
        &self,
        request: Request<proto::GetDoctorPrescriptionsRequest>,
    ) -> Result<Response<proto::PrescriptionsResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC GetDoctorPrescriptions request: doctor_id={}",
            req.doctor_id
        );

        let prescriptions = self
            .server
            .prescriptions
            .get_doctor_prescriptions(&req.doctor_id, convert::date_range(req.from_date, req.to_date))
            .await
            .map_err(to_status)?;
        Ok(Response::new(convert::prescriptions(prescriptions)))
    }

    #[instrument(name = "grpc.GetAppointmentPrescription", skip_all)]
    async fn get_appointment_prescription(
        &self,
        request: Request<proto::GetAppointmentPrescriptionRequest>,
    ) -> Result<Response<proto::PrescriptionResponse>, Status> {
        let req = request.into_inner();
        redacted_info!(
            self.server.logger,
            "gRPC GetAppointmentPrescription request: appointment_id={}",
            req.appointment_id
        );

        let prescription = self
            .server
            .prescriptions
            .get_appointment_prescription(&req.appointment_id)
            .await
            .map_err(to_status)?;
        Ok(Response::new(prescription.into()))
    }
}
