use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::coded_enum;

coded_enum! {
    pub enum Gender {
        Unspecified = 0,
        Male = 1,
        Female = 2,
        Other = 3,
    }
}

coded_enum! {
    pub enum BloodGroup {
        Unspecified = 0,
        APositive = 1,
        ANegative = 2,
        BPositive = 3,
        BNegative = 4,
        AbPositive = 5,
        AbNegative = 6,
        OPositive = 7,
        ONegative = 8,
    }
}

impl Default for Gender {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl Default for BloodGroup {
    fn default() -> Self {
        Self::Unspecified
    }
}

/// Postal address, stored as JSON text on the patient row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    /// `YYYY-MM-DD`, empty when unknown
    pub date_of_birth: String,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub address: Option<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Display name snapshotted onto appointments and prescriptions
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
