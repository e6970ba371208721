// Standardized error codes carried in API error responses

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
}

pub mod resource {
    pub const NOT_FOUND: &str = "RESOURCE_2001";
    pub const ALREADY_EXISTS: &str = "RESOURCE_2002";
}

pub mod scheduling {
    pub const SLOT_CONFLICT: &str = "SCHEDULING_3001";
    pub const INVALID_STATUS_TRANSITION: &str = "SCHEDULING_3002";
}

pub mod database {
    pub const STORAGE_FAILURE: &str = "DB_4001";
}

pub mod server {
    pub const MALFORMED_REQUEST: &str = "SERVER_5001";
    pub const INTERNAL_ERROR: &str = "SERVER_5002";
}
