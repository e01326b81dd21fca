use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use crate::models::{AppointmentRecord, AppointmentStatus, DaySchedule};

/// Persistence boundary for day schedules. Implementations own durability
/// and versioning; the engine treats `save` as a whole-document write.
#[async_trait]
pub trait DayScheduleStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DaySchedule>>;

    async fn find_by_id_and_doctor(&self, id: Uuid, doctor_id: Uuid)
        -> Result<Option<DaySchedule>>;

    async fn find_by_doctor_and_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<DaySchedule>>;

    async fn find_by_doctor_and_dates(
        &self,
        doctor_id: Uuid,
        dates: &[NaiveDate],
    ) -> Result<Vec<DaySchedule>>;

    async fn find_by_doctor_and_date_range(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DaySchedule>>;

    async fn save(&self, schedule: DaySchedule) -> Result<DaySchedule>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Lookup/cancel access to the externally owned appointment records. The
/// engine never constructs or deletes appointments through this.
#[async_trait]
pub trait AppointmentDirectory: Send + Sync {
    async fn find_by_id(&self, appointment_id: Uuid) -> Result<Option<AppointmentRecord>>;

    async fn mark_cancelled(&self, appointment_id: Uuid) -> Result<()>;
}

/// Injected source of "today" and "now" so date-horizon rules are
/// testable without touching the wall clock.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for tests and replay.
#[derive(Debug, Clone)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

// ==============================================================================
// IN-MEMORY IMPLEMENTATIONS
// ==============================================================================

/// HashMap-backed store used by tests and single-process embeddings.
#[derive(Default)]
pub struct InMemoryDayScheduleStore {
    schedules: Mutex<HashMap<Uuid, DaySchedule>>,
}

impl InMemoryDayScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_schedules<T>(&self, f: impl FnOnce(&mut HashMap<Uuid, DaySchedule>) -> T) -> T {
        let mut guard = self
            .schedules
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[async_trait]
impl DayScheduleStore for InMemoryDayScheduleStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DaySchedule>> {
        Ok(self.with_schedules(|schedules| schedules.get(&id).cloned()))
    }

    async fn find_by_id_and_doctor(
        &self,
        id: Uuid,
        doctor_id: Uuid,
    ) -> Result<Option<DaySchedule>> {
        Ok(self.with_schedules(|schedules| {
            schedules
                .get(&id)
                .filter(|schedule| schedule.doctor_id == doctor_id)
                .cloned()
        }))
    }

    async fn find_by_doctor_and_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<DaySchedule>> {
        Ok(self.with_schedules(|schedules| {
            schedules
                .values()
                .find(|schedule| schedule.doctor_id == doctor_id && schedule.date == date)
                .cloned()
        }))
    }

    async fn find_by_doctor_and_dates(
        &self,
        doctor_id: Uuid,
        dates: &[NaiveDate],
    ) -> Result<Vec<DaySchedule>> {
        let mut found = self.with_schedules(|schedules| {
            schedules
                .values()
                .filter(|schedule| {
                    schedule.doctor_id == doctor_id && dates.contains(&schedule.date)
                })
                .cloned()
                .collect::<Vec<_>>()
        });
        found.sort_by_key(|schedule| schedule.date);
        Ok(found)
    }

    async fn find_by_doctor_and_date_range(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DaySchedule>> {
        let mut found = self.with_schedules(|schedules| {
            schedules
                .values()
                .filter(|schedule| {
                    schedule.doctor_id == doctor_id
                        && schedule.date >= start
                        && schedule.date <= end
                })
                .cloned()
                .collect::<Vec<_>>()
        });
        found.sort_by_key(|schedule| schedule.date);
        Ok(found)
    }

    async fn save(&self, schedule: DaySchedule) -> Result<DaySchedule> {
        self.with_schedules(|schedules| {
            schedules.insert(schedule.id, schedule.clone());
        });
        Ok(schedule)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.with_schedules(|schedules| {
            schedules.remove(&id);
        });
        Ok(())
    }
}

/// HashMap-backed appointment directory for tests and embeddings.
#[derive(Default)]
pub struct InMemoryAppointmentDirectory {
    records: Mutex<HashMap<Uuid, AppointmentRecord>>,
}

impl InMemoryAppointmentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: AppointmentRecord) {
        let mut guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(record.id, record);
    }

    pub fn status_of(&self, appointment_id: Uuid) -> Option<AppointmentStatus> {
        let guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        guard.get(&appointment_id).map(|record| record.status.clone())
    }
}

#[async_trait]
impl AppointmentDirectory for InMemoryAppointmentDirectory {
    async fn find_by_id(&self, appointment_id: Uuid) -> Result<Option<AppointmentRecord>> {
        let guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(&appointment_id).cloned())
    }

    async fn mark_cancelled(&self, appointment_id: Uuid) -> Result<()> {
        let mut guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(record) = guard.get_mut(&appointment_id) {
            record.status = AppointmentStatus::Cancelled;
        }
        Ok(())
    }
}
