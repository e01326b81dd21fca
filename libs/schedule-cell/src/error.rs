use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Closed error set for the scheduling engine. Callers pattern-match on
/// these variants instead of parsing message strings; the variants map
/// onto the usual 4xx categories (bad input, not found, conflict) plus a
/// retryable storage failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Slot duration of {minutes} minutes is below the {minimum} minute minimum")]
    InvalidSlotDuration { minutes: i64, minimum: i64 },

    #[error("Gap duration cannot be negative (got {minutes})")]
    InvalidGapDuration { minutes: i64 },

    #[error("Invalid time slot combination. Check start time, end time, slot duration and gap settings")]
    InvalidTimeCombination,

    #[error("Cannot fit a single slot in the requested range. Reduce the slot duration")]
    SlotTooLarge,

    #[error("Cannot operate on past date {date}")]
    PastDateOperation { date: NaiveDate },

    #[error("Cannot operate on {date}: outside the current month")]
    NextMonthRestriction { date: NaiveDate },

    #[error("Slot {slot_id} not found")]
    SlotNotFound { slot_id: Uuid },

    #[error("Day schedule not found")]
    DayScheduleNotFound,

    #[error("Doctor {doctor_id} is not authorized to modify this schedule")]
    UnauthorizedAccess { doctor_id: Uuid },

    #[error("Operation conflicts with booked appointments: {details}")]
    BookedSlotConflict { details: String },

    #[error("Slot cannot be reduced below {minimum} minutes")]
    MinimumDurationViolation { minimum: i64 },

    #[error("Cannot reschedule an available slot")]
    CannotRescheduleAvailableSlot,

    #[error("New slot is already booked")]
    SlotAlreadyBooked,

    #[error("Storage unavailable: {0}")]
    Storage(String),
}

impl ScheduleError {
    pub fn storage(err: anyhow::Error) -> Self {
        ScheduleError::Storage(err.to_string())
    }

    /// Whether retrying the same request can succeed without caller changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScheduleError::Storage(_))
    }
}
