use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One medication line of a prescription
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Medication {
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub route: String,
    pub instructions: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prescription {
    pub id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub medications: Vec<Medication>,
    pub diagnosis: String,
    pub additional_instructions: String,
    pub prescription_date: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    /// Stored flag. Readers should go through [`Prescription::with_derived_activity`].
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Prescription {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_until < now
    }

    /// Copy of this prescription as seen at `now`: expired prescriptions read
    /// as inactive. The stored row is left untouched.
    #[must_use]
    pub fn with_derived_activity(mut self, now: DateTime<Utc>) -> Self {
        if self.is_expired_at(now) {
            self.is_active = false;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn prescription(valid_until: DateTime<Utc>) -> Prescription {
        let issued = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        Prescription {
            id: Uuid::new_v4(),
            appointment_id: None,
            patient_id: Uuid::new_v4(),
            patient_name: "Jane Roe".into(),
            doctor_id: Uuid::new_v4(),
            doctor_name: "Greg House".into(),
            medications: vec![Medication::default()],
            diagnosis: String::new(),
            additional_instructions: String::new(),
            prescription_date: issued,
            valid_until,
            is_active: true,
            created_at: issued,
        }
    }

    #[test]
    fn active_until_the_last_instant() {
        let until = Utc.with_ymd_and_hms(2025, 3, 31, 9, 0, 0).unwrap();
        let p = prescription(until);
        assert!(p.clone().with_derived_activity(until).is_active);
        assert!(!p.with_derived_activity(until + Duration::seconds(1)).is_active);
    }

    #[test]
    fn never_reactivates_a_stored_inactive_flag() {
        let until = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let mut p = prescription(until);
        p.is_active = false;
        assert!(!p.with_derived_activity(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()).is_active);
    }
}
