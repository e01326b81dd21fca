use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

/// Per-(doctor, date) write serialization. Every mutation acquires the
/// key's guard before its read-modify-write and holds it through the
/// store write; reads go without it.
#[derive(Default)]
pub struct ScheduleLockRegistry {
    locks: Mutex<HashMap<(Uuid, NaiveDate), Arc<tokio::sync::Mutex<()>>>>,
}

impl ScheduleLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, doctor_id: Uuid, date: NaiveDate) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks
                .entry((doctor_id, date))
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }

    /// Acquire two day guards in key order, so concurrent cross-day
    /// operations cannot deadlock on opposite acquisition orders. Equal
    /// dates share one key and yield a single guard.
    pub async fn acquire_pair(
        &self,
        doctor_id: Uuid,
        first_date: NaiveDate,
        second_date: NaiveDate,
    ) -> (OwnedMutexGuard<()>, Option<OwnedMutexGuard<()>>) {
        if first_date == second_date {
            (self.acquire(doctor_id, first_date).await, None)
        } else if first_date < second_date {
            let first = self.acquire(doctor_id, first_date).await;
            let second = self.acquire(doctor_id, second_date).await;
            (first, Some(second))
        } else {
            let second = self.acquire(doctor_id, second_date).await;
            let first = self.acquire(doctor_id, first_date).await;
            (first, Some(second))
        }
    }

    #[cfg(test)]
    pub fn registered_keys(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    #[tokio::test]
    async fn test_same_key_reuses_one_lock() {
        let registry = ScheduleLockRegistry::new();
        let doctor_id = Uuid::new_v4();

        let guard = registry.acquire(doctor_id, date(14)).await;
        drop(guard);
        let _guard = registry.acquire(doctor_id, date(14)).await;

        assert_eq!(registry.registered_keys(), 1);
    }

    #[tokio::test]
    async fn test_distinct_days_lock_independently() {
        let registry = ScheduleLockRegistry::new();
        let doctor_id = Uuid::new_v4();

        let _first = registry.acquire(doctor_id, date(14)).await;
        // Would deadlock here if day keys shared a lock
        let _second = registry.acquire(doctor_id, date(15)).await;

        assert_eq!(registry.registered_keys(), 2);
    }

    #[tokio::test]
    async fn test_pair_acquisition_orders_by_date() {
        let registry = ScheduleLockRegistry::new();
        let doctor_id = Uuid::new_v4();

        let (first, second) = registry.acquire_pair(doctor_id, date(20), date(10)).await;
        assert!(second.is_some());
        drop(first);
        drop(second);

        let (_a, _b) = registry.acquire_pair(doctor_id, date(10), date(20)).await;
    }

    #[tokio::test]
    async fn test_pair_acquisition_collapses_equal_dates() {
        let registry = ScheduleLockRegistry::new();
        let doctor_id = Uuid::new_v4();

        let (_guard, second) = registry.acquire_pair(doctor_id, date(14), date(14)).await;
        assert!(second.is_none());
    }
}
