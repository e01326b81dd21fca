use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE SCHEDULE MODELS
// ==============================================================================

/// All bookable time for one doctor on one calendar date. Slots are kept
/// sorted ascending by start time and pairwise non-overlapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DaySchedule {
    pub fn new(doctor_id: Uuid, date: NaiveDate, slots: Vec<Slot>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            doctor_id,
            date,
            slots,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn slot(&self, slot_id: Uuid) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id == slot_id)
    }

    /// Swap in a freshly built slot sequence. Mutations never edit the
    /// slot list in place mid-iteration; they construct the replacement
    /// and commit it through here.
    pub fn replace_slots(&mut self, slots: Vec<Slot>) {
        self.slots = slots;
        self.updated_at = Utc::now();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Interval covering the owning calendar date, half-open.
    pub fn day_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.date.and_time(NaiveTime::MIN).and_utc();
        (start, start + Duration::days(1))
    }
}

/// One contiguous bookable or booked interval. A slot is available
/// exactly when it carries no appointment reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_available: bool,
    pub appointment_id: Option<Uuid>,
}

impl Slot {
    pub fn available(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time,
            end_time,
            is_available: true,
            appointment_id: None,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    pub fn book(&mut self, appointment_id: Uuid) {
        self.appointment_id = Some(appointment_id);
        self.is_available = false;
    }

    pub fn release(&mut self) {
        self.appointment_id = None;
        self.is_available = true;
    }

    /// "10:00 - 10:20" rendering used in conflict messages.
    pub fn time_range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

// ==============================================================================
// APPOINTMENT REFERENCE (owned elsewhere)
// ==============================================================================

/// Read-model of the externally owned appointment record. The engine only
/// follows the weak reference from a booked slot; it never creates or
/// deletes appointments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: Uuid,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Rescheduled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::InProgress => write!(f, "in_progress"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Rescheduled => write!(f, "rescheduled"),
        }
    }
}

// ==============================================================================
// REQUEST DTOS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlotRequest {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i64,
    pub gap_duration_minutes: i64,
    pub is_recurring: Option<bool>,
    pub recurring_end_date: Option<NaiveDate>,
    /// Weekday indices, 0 = Sunday through 6 = Saturday.
    pub recurring_days: Option<Vec<u32>>,
}

impl ScheduleSlotRequest {
    pub fn is_recurring(&self) -> bool {
        self.is_recurring.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotExtensionRequest {
    pub day_schedule_id: Uuid,
    pub slot_id: Uuid,
    pub extend_start_time: bool,
    pub start_extension_minutes: u32,
    pub extend_end_time: bool,
    pub end_extension_minutes: u32,
    pub force_extension: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSlotsRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub old_day_schedule_id: Uuid,
    pub old_slot_id: Uuid,
    pub new_day_schedule_id: Uuid,
    pub new_slot_id: Uuid,
}

// ==============================================================================
// OPERATION OUTCOMES
// ==============================================================================

/// Result of an extend attempt. An invalid outcome with
/// `can_force_extension` set is a decision point for the caller, not an
/// error: resubmitting with `force_extension` removes the listed
/// available slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotExtensionOutcome {
    pub valid: bool,
    pub can_force_extension: bool,
    pub message: String,
    pub conflicting_available_slots: Vec<Slot>,
    pub removed_slots: Vec<Slot>,
    pub schedule: Option<DaySchedule>,
}

impl SlotExtensionOutcome {
    pub fn extended(message: String, removed_slots: Vec<Slot>, schedule: DaySchedule) -> Self {
        Self {
            valid: true,
            can_force_extension: false,
            message,
            conflicting_available_slots: Vec::new(),
            removed_slots,
            schedule: Some(schedule),
        }
    }

    pub fn needs_confirmation(message: String, conflicting_available_slots: Vec<Slot>) -> Self {
        Self {
            valid: false,
            can_force_extension: true,
            message,
            conflicting_available_slots,
            removed_slots: Vec::new(),
            schedule: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DeleteSlotOutcome {
    /// The slot was booked: the linked appointment was cancelled and the
    /// slot kept as available time, preserving the schedule history.
    BookingCancelled {
        slot_id: Uuid,
        appointment_id: Option<Uuid>,
    },
    /// The slot was available and has been removed outright.
    SlotRemoved {
        slot_id: Uuid,
        day_schedule_deleted: bool,
    },
}

/// Identities touched by a reschedule, for the caller's appointment-side
/// bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleOutcome {
    pub appointment_id: Option<Uuid>,
    pub freed_slot_id: Uuid,
    pub booked_slot_id: Uuid,
}
