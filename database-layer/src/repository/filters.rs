use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus, Doctor, Patient, Specialization};

/// Inclusive calendar-day range applied to timestamp columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Midnight UTC of `from`
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.from.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Midnight UTC of the day after `to`, so the whole `to` day is included
    pub fn end_exclusive(&self) -> Option<DateTime<Utc>> {
        self.to
            .and_then(|d| d.succ_opt())
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start().map_or(true, |start| at >= start)
            && self.end_exclusive().map_or(true, |end| at < end)
    }
}

/// Appointment listing filters. Dates are `YYYY-MM-DD` and compared as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub date: Option<String>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        let date = appointment.appointment_date.as_str();
        self.status.map_or(true, |s| appointment.status == s)
            && self.from_date.as_deref().map_or(true, |from| date >= from)
            && self.to_date.as_deref().map_or(true, |to| date <= to)
            && self.date.as_deref().map_or(true, |d| date == d)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientSearch {
    /// Case-insensitive substring of first or last name
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub patient_id: Option<Uuid>,
}

impl PatientSearch {
    pub fn matches(&self, patient: &Patient) -> bool {
        self.name
            .as_deref()
            .map_or(true, |n| name_matches(n, &patient.first_name, &patient.last_name))
            && self.email.as_deref().map_or(true, |e| patient.email == e)
            && self.phone_number.as_deref().map_or(true, |p| patient.phone_number == p)
            && self.patient_id.map_or(true, |id| patient.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorSearch {
    pub name: Option<String>,
    pub specialization: Option<Specialization>,
    pub is_available: Option<bool>,
}

impl DoctorSearch {
    pub fn matches(&self, doctor: &Doctor) -> bool {
        self.name
            .as_deref()
            .map_or(true, |n| name_matches(n, &doctor.first_name, &doctor.last_name))
            && self.specialization.map_or(true, |s| doctor.specialization == s)
            && self.is_available.map_or(true, |a| doctor.is_available == a)
    }
}

fn name_matches(needle: &str, first: &str, last: &str) -> bool {
    let needle = needle.to_lowercase();
    first.to_lowercase().contains(&needle) || last.to_lowercase().contains(&needle)
}

/// `%needle%` with LIKE metacharacters escaped
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
