use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::coded_enum;

coded_enum! {
    pub enum Specialization {
        Unspecified = 0,
        GeneralPractice = 1,
        Cardiology = 2,
        Dermatology = 3,
        Neurology = 4,
        Orthopedics = 5,
        Pediatrics = 6,
        Psychiatry = 7,
        Gynecology = 8,
        Ophthalmology = 9,
        Ent = 10,
        Oncology = 11,
    }
}

impl Default for Specialization {
    fn default() -> Self {
        Self::Unspecified
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub specialization: Specialization,
    pub license_number: String,
    pub years_of_experience: i32,
    pub qualifications: Vec<String>,
    pub languages: Vec<String>,
    pub consultation_fee: i32,
    pub is_available: bool,
    pub average_rating: f32,
    pub total_consultations: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One weekly availability window. A doctor's set is replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorAvailability {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub slot_duration_minutes: i32,
}
