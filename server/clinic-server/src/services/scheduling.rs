//! Appointment scheduling rules
//!
//! Two pieces of pure logic live here so they can be tested without a
//! repository: the status transition table and the fixed daily slot grid.

use chrono::{Duration, NaiveTime};
use database_layer::AppointmentStatus;
use error_common::{ClinicError, Result};

/// First bookable slot of the day
pub const DAY_START_HOUR: u32 = 9;
/// Slots end at this hour; the last one starts half an hour earlier
pub const DAY_END_HOUR: u32 = 17;
pub const SLOT_MINUTES: i64 = 30;

/// Actions that move an appointment out of its current status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Cancel,
    Reschedule,
    Complete,
}

/// Checks whether `action` may be applied to an appointment in `status`.
///
/// Cancelled and completed appointments are terminal. Every other status
/// accepts all three actions.
///
/// # Errors
///
/// [`ClinicError::InvalidTransition`] carrying the message for the
/// forbidden pair.
pub fn check_transition(status: AppointmentStatus, action: AppointmentAction) -> Result<()> {
    use AppointmentAction::{Cancel, Complete, Reschedule};
    use AppointmentStatus::{Cancelled, Completed};

    let message = match (status, action) {
        (Cancelled, Cancel) => "appointment is already cancelled",
        (Completed, Cancel) => "cannot cancel a completed appointment",
        (Cancelled, Reschedule) => "cannot reschedule a cancelled appointment",
        (Completed, Reschedule) => "cannot reschedule a completed appointment",
        (Cancelled, Complete) => "cannot complete a cancelled appointment",
        (Completed, Complete) => "appointment is already completed",
        _ => return Ok(()),
    };
    Err(ClinicError::invalid_transition(message))
}

/// Status an appointment takes once `action` succeeds
pub fn next_status(action: AppointmentAction) -> AppointmentStatus {
    match action {
        AppointmentAction::Cancel => AppointmentStatus::Cancelled,
        AppointmentAction::Reschedule => AppointmentStatus::Rescheduled,
        AppointmentAction::Complete => AppointmentStatus::Completed,
    }
}

/// One half-hour window of the daily grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// The fixed 09:00 to 17:00 grid in 30 minute steps.
///
/// Doctor availability windows are not consulted here.
pub fn day_slots() -> Vec<SlotWindow> {
    let step = Duration::minutes(SLOT_MINUTES);
    let (Some(first), Some(close)) = (
        NaiveTime::from_hms_opt(DAY_START_HOUR, 0, 0),
        NaiveTime::from_hms_opt(DAY_END_HOUR, 0, 0),
    ) else {
        return Vec::new();
    };

    let mut slots = Vec::new();
    let mut start = first;
    while start < close {
        let end = start + step;
        slots.push(SlotWindow { start, end });
        start = end;
    }
    slots
}
