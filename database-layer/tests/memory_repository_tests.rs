// In-memory repository tests: uniqueness, ordering and filtering
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use database_layer::repository::{
    AppointmentFilter, AppointmentRepository, DateRange, DoctorRepository, DoctorSearch,
    InMemoryAppointmentRepository, InMemoryDoctorRepository, InMemoryMedicalRecordRepository,
    InMemoryPatientRepository, InMemoryPrescriptionRepository, MedicalRecordRepository,
    PatientRepository, PatientSearch, PrescriptionRepository,
};
use database_layer::{
    constraints, Appointment, AppointmentStatus, ConsultationType, DatabaseError, Doctor,
    DoctorAvailability, MedicalRecord, Medication, Patient, Prescription, Specialization,
};
use uuid::Uuid;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn patient(first: &str, last: &str, email: &str, phone: &str) -> Patient {
    let now = Utc::now();
    Patient {
        id: Uuid::new_v4(),
        first_name: first.into(),
        last_name: last.into(),
        email: email.into(),
        phone_number: phone.into(),
        date_of_birth: "1990-04-12".into(),
        gender: Default::default(),
        blood_group: Default::default(),
        address: None,
        created_at: now,
        updated_at: now,
    }
}

fn doctor(email: &str, phone: &str, license: &str) -> Doctor {
    let now = Utc::now();
    Doctor {
        id: Uuid::new_v4(),
        first_name: "Meredith".into(),
        last_name: "Grey".into(),
        email: email.into(),
        phone_number: phone.into(),
        specialization: Specialization::Cardiology,
        license_number: license.into(),
        years_of_experience: 12,
        qualifications: vec!["MD".into()],
        languages: vec!["English".into()],
        consultation_fee: 150,
        is_available: true,
        average_rating: 0.0,
        total_consultations: 0,
        created_at: now,
        updated_at: now,
    }
}

fn appointment(doctor_id: Uuid, patient_id: Uuid, date: &str, time: &str) -> Appointment {
    let now = Utc::now();
    Appointment {
        id: Uuid::new_v4(),
        patient_id,
        patient_name: "Jane Roe".into(),
        doctor_id,
        doctor_name: "Meredith Grey".into(),
        appointment_date: date.into(),
        appointment_time: time.into(),
        status: AppointmentStatus::Scheduled,
        consultation_type: ConsultationType::InPerson,
        reason_for_visit: "checkup".into(),
        notes: String::new(),
        diagnosis: String::new(),
        cancelled_at: None,
        cancellation_reason: None,
        created_at: now,
        updated_at: now,
    }
}

fn prescription(patient_id: Uuid, issued_on: NaiveDate) -> Prescription {
    let issued = issued_on.and_hms_opt(10, 0, 0).unwrap().and_utc();
    Prescription {
        id: Uuid::new_v4(),
        appointment_id: None,
        patient_id,
        patient_name: "Jane Roe".into(),
        doctor_id: Uuid::new_v4(),
        doctor_name: "Meredith Grey".into(),
        medications: vec![Medication {
            medication_name: "Amoxicillin".into(),
            quantity: 21,
            ..Default::default()
        }],
        diagnosis: String::new(),
        additional_instructions: String::new(),
        prescription_date: issued,
        valid_until: issued + Duration::days(30),
        is_active: true,
        created_at: issued,
    }
}

fn constraint_of(err: DatabaseError) -> String {
    err.violated_constraint().unwrap_or_default().to_string()
}

// =============================================================================
// PATIENTS
// =============================================================================

#[tokio::test]
async fn test_patient_email_and_phone_are_unique() {
    let repo = InMemoryPatientRepository::new();
    repo.create(&patient("Jane", "Roe", "jane@example.com", "555-0100")).await.unwrap();

    let same_email = patient("Janet", "Roe", "jane@example.com", "555-0199");
    let err = repo.create(&same_email).await.unwrap_err();
    assert_eq!(constraint_of(err), constraints::PATIENT_EMAIL);

    let same_phone = patient("Janet", "Roe", "janet@example.com", "555-0100");
    let err = repo.create(&same_phone).await.unwrap_err();
    assert_eq!(constraint_of(err), constraints::PATIENT_PHONE);

    assert_eq!(repo.search(&PatientSearch::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_patient_update_cannot_steal_another_email() {
    let repo = InMemoryPatientRepository::new();
    let jane = patient("Jane", "Roe", "jane@example.com", "555-0100");
    let mut john = patient("John", "Doe", "john@example.com", "555-0101");
    repo.create(&jane).await.unwrap();
    repo.create(&john).await.unwrap();

    john.email = jane.email.clone();
    let err = repo.update(&john).await.unwrap_err();
    assert_eq!(constraint_of(err), constraints::PATIENT_EMAIL);

    // Re-saving a row with its own values is not a conflict
    repo.update(&jane).await.unwrap();
}

#[tokio::test]
async fn test_patient_search_by_name_is_case_insensitive() {
    let repo = InMemoryPatientRepository::new();
    repo.create(&patient("Jane", "Roe", "jane@example.com", "555-0100")).await.unwrap();
    repo.create(&patient("John", "Doe", "john@example.com", "555-0101")).await.unwrap();

    let found = repo
        .search(&PatientSearch {
            name: Some("ROE".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first_name, "Jane");

    let all = repo.search(&PatientSearch::default()).await.unwrap();
    assert_eq!(all[0].first_name, "Jane", "registration order is kept");
}

// =============================================================================
// DOCTORS
// =============================================================================

#[tokio::test]
async fn test_doctor_license_is_unique() {
    let repo = InMemoryDoctorRepository::new();
    repo.create(&doctor("a@clinic.test", "555-0200", "LIC-1")).await.unwrap();

    let err = repo
        .create(&doctor("b@clinic.test", "555-0201", "LIC-1"))
        .await
        .unwrap_err();
    assert_eq!(constraint_of(err), constraints::DOCTOR_LICENSE);
}

#[tokio::test]
async fn test_availability_is_replaced_wholesale() {
    let repo = InMemoryDoctorRepository::new();
    let doc = doctor("a@clinic.test", "555-0200", "LIC-1");
    repo.create(&doc).await.unwrap();

    let window = |day: &str| DoctorAvailability {
        id: Uuid::new_v4(),
        doctor_id: Uuid::nil(),
        day_of_week: day.into(),
        start_time: "09:00".into(),
        end_time: "17:00".into(),
        slot_duration_minutes: 30,
    };

    repo.set_availability(doc.id, &[window("MONDAY"), window("TUESDAY")]).await.unwrap();
    repo.set_availability(doc.id, &[window("FRIDAY")]).await.unwrap();

    let stored = repo.get_availability(doc.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].day_of_week, "FRIDAY");
    assert_eq!(stored[0].doctor_id, doc.id);
}

#[tokio::test]
async fn test_increment_consultations() {
    let repo = InMemoryDoctorRepository::new();
    let doc = doctor("a@clinic.test", "555-0200", "LIC-1");
    repo.create(&doc).await.unwrap();

    repo.increment_consultations(doc.id).await.unwrap();
    repo.increment_consultations(doc.id).await.unwrap();
    assert_eq!(repo.get(doc.id).await.unwrap().unwrap().total_consultations, 2);

    assert!(repo.increment_consultations(Uuid::new_v4()).await.is_err());
}

#[tokio::test]
async fn test_doctor_search_filters_combine() {
    let repo = InMemoryDoctorRepository::new();
    let mut away = doctor("a@clinic.test", "555-0200", "LIC-1");
    away.is_available = false;
    repo.create(&away).await.unwrap();
    repo.create(&doctor("b@clinic.test", "555-0201", "LIC-2")).await.unwrap();

    let found = repo
        .search(&DoctorSearch {
            specialization: Some(Specialization::Cardiology),
            is_available: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].email, "b@clinic.test");
}

// =============================================================================
// APPOINTMENTS
// =============================================================================

#[tokio::test]
async fn test_active_slot_is_exclusive() {
    let repo = InMemoryAppointmentRepository::new();
    let doctor_id = Uuid::new_v4();
    repo.create(&appointment(doctor_id, Uuid::new_v4(), "2025-06-02", "10:00"))
        .await
        .unwrap();

    let err = repo
        .create(&appointment(doctor_id, Uuid::new_v4(), "2025-06-02", "10:00"))
        .await
        .unwrap_err();
    assert_eq!(constraint_of(err), constraints::APPOINTMENT_ACTIVE_SLOT);

    // Another doctor may use the same slot
    repo.create(&appointment(Uuid::new_v4(), Uuid::new_v4(), "2025-06-02", "10:00"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cancelled_appointment_frees_its_slot() {
    let repo = InMemoryAppointmentRepository::new();
    let doctor_id = Uuid::new_v4();
    let mut first = appointment(doctor_id, Uuid::new_v4(), "2025-06-02", "10:00");
    repo.create(&first).await.unwrap();

    first.status = AppointmentStatus::Cancelled;
    repo.update(&first).await.unwrap();

    let second = appointment(doctor_id, Uuid::new_v4(), "2025-06-02", "10:00");
    repo.create(&second).await.unwrap();

    let conflict = repo
        .check_conflict(doctor_id, "2025-06-02", "10:00", None)
        .await
        .unwrap();
    assert_eq!(conflict.map(|a| a.id), Some(second.id));

    let excluded = repo
        .check_conflict(doctor_id, "2025-06-02", "10:00", Some(second.id))
        .await
        .unwrap();
    assert!(excluded.is_none());
}

#[tokio::test]
async fn test_patient_appointments_are_newest_first_and_filterable() {
    let repo = InMemoryAppointmentRepository::new();
    let doctor_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();
    for (date, time) in [("2025-06-01", "09:00"), ("2025-06-03", "09:00"), ("2025-06-03", "11:30")] {
        repo.create(&appointment(doctor_id, patient_id, date, time)).await.unwrap();
    }

    let all = repo
        .list_by_patient(patient_id, &AppointmentFilter::default())
        .await
        .unwrap();
    let order: Vec<_> = all
        .iter()
        .map(|a| (a.appointment_date.as_str(), a.appointment_time.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![("2025-06-03", "11:30"), ("2025-06-03", "09:00"), ("2025-06-01", "09:00")]
    );

    let ranged = repo
        .list_by_patient(
            patient_id,
            &AppointmentFilter {
                from_date: Some("2025-06-02".into()),
                to_date: Some("2025-06-03".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ranged.len(), 2);

    let by_day = repo
        .list_by_doctor_and_date(doctor_id, "2025-06-03")
        .await
        .unwrap();
    assert_eq!(by_day[0].appointment_time, "09:00");
}

// =============================================================================
// PRESCRIPTIONS AND MEDICAL RECORDS
// =============================================================================

#[tokio::test]
async fn test_prescription_range_includes_whole_end_day() {
    let repo = InMemoryPrescriptionRepository::new();
    let patient_id = Uuid::new_v4();
    let day = |d| NaiveDate::from_ymd_opt(2025, 5, d).unwrap();
    for d in [1, 10, 20] {
        repo.create(&prescription(patient_id, day(d))).await.unwrap();
    }

    let found = repo
        .list_by_patient(patient_id, &DateRange::new(Some(day(10)), Some(day(20))))
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
    assert!(found[0].prescription_date > found[1].prescription_date);
}

#[tokio::test]
async fn test_prescription_lookup_by_appointment() {
    let repo = InMemoryPrescriptionRepository::new();
    let appointment_id = Uuid::new_v4();
    let mut linked = prescription(Uuid::new_v4(), NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
    linked.appointment_id = Some(appointment_id);
    repo.create(&linked).await.unwrap();

    let found = repo.get_by_appointment(appointment_id).await.unwrap();
    assert_eq!(found.map(|p| p.id), Some(linked.id));
    assert!(repo.get_by_appointment(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_medical_records_newest_visit_first() {
    let repo = InMemoryMedicalRecordRepository::new();
    let patient_id = Uuid::new_v4();
    for day in [3, 9, 6] {
        let visit = Utc.with_ymd_and_hms(2025, 2, day, 14, 0, 0).unwrap();
        repo.create(&MedicalRecord {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id: Uuid::new_v4(),
            visit_date: visit,
            diagnosis: format!("visit {day}"),
            symptoms: String::new(),
            treatment: String::new(),
            prescriptions: String::new(),
            lab_results: String::new(),
            vital_signs: None,
            notes: String::new(),
            follow_up_date: None,
            record_type: "CONSULTATION".into(),
            created_at: visit,
            updated_at: visit,
        })
        .await
        .unwrap();
    }

    let history = repo.list_by_patient(patient_id, &DateRange::default()).await.unwrap();
    let diagnoses: Vec<_> = history.iter().map(|r| r.diagnosis.as_str()).collect();
    assert_eq!(diagnoses, vec!["visit 9", "visit 6", "visit 3"]);
}
