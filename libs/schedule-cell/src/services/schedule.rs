use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::error::ScheduleError;
use crate::models::{
    DaySchedule, DeleteSlotOutcome, DeleteSlotsRequest, RescheduleOutcome, RescheduleRequest,
    ScheduleSlotRequest, Slot, SlotExtensionOutcome, SlotExtensionRequest,
};
use crate::services::generator;
use crate::services::interval::overlaps;
use crate::services::locks::ScheduleLockRegistry;
use crate::services::merge::merge;
use crate::store::{AppointmentDirectory, Clock, DayScheduleStore};

/// Public surface of the scheduling engine. Every operation takes the
/// caller's (already authenticated) doctor identity explicitly; there is
/// no ambient request context. Writes serialize per (doctor, date)
/// through the lock registry before their read-modify-write.
pub struct ScheduleService {
    store: Arc<dyn DayScheduleStore>,
    appointments: Arc<dyn AppointmentDirectory>,
    clock: Arc<dyn Clock>,
    config: AppConfig,
    locks: ScheduleLockRegistry,
}

impl ScheduleService {
    pub fn new(
        store: Arc<dyn DayScheduleStore>,
        appointments: Arc<dyn AppointmentDirectory>,
        clock: Arc<dyn Clock>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            appointments,
            clock,
            config,
            locks: ScheduleLockRegistry::new(),
        }
    }

    /// Day schedules for the given dates. Viewing is limited to the
    /// current calendar month.
    pub async fn get_daily_schedule(
        &self,
        doctor_id: Uuid,
        dates: &[NaiveDate],
    ) -> Result<Vec<DaySchedule>, ScheduleError> {
        let today = self.clock.today();
        for date in dates {
            ensure_current_month(*date, today)?;
        }

        self.store
            .find_by_doctor_and_dates(doctor_id, dates)
            .await
            .map_err(ScheduleError::storage)
    }

    /// Generate slots for the requested time range and merge them into
    /// each targeted day, expanding the recurrence when one is given.
    pub async fn add_slots(
        &self,
        doctor_id: Uuid,
        request: ScheduleSlotRequest,
    ) -> Result<Vec<DaySchedule>, ScheduleError> {
        debug!(
            "Adding slots for doctor {} starting {}",
            doctor_id, request.start_date
        );
        self.validate_slot_request(&request)?;

        let new_schedules = self.create_day_schedules(doctor_id, &request);

        let mut saved = Vec::with_capacity(new_schedules.len());
        for schedule in new_schedules {
            let _guard = self.locks.acquire(doctor_id, schedule.date).await;

            let existing = self
                .store
                .find_by_doctor_and_date(doctor_id, schedule.date)
                .await
                .map_err(ScheduleError::storage)?;

            let updated = match existing {
                None => self
                    .store
                    .save(schedule)
                    .await
                    .map_err(ScheduleError::storage)?,
                Some(mut day) => {
                    let merged = if day.slots.is_empty() {
                        schedule.slots
                    } else {
                        merge(&day.slots, &schedule.slots, request.gap_duration_minutes)
                    };
                    day.replace_slots(merged);
                    self.store
                        .save(day)
                        .await
                        .map_err(ScheduleError::storage)?
                }
            };

            saved.push(updated);
        }

        Ok(saved)
    }

    /// End times a doctor can pick for `start_time` under the given slot
    /// and gap settings.
    pub fn calculate_possible_end_times(
        &self,
        start_time: NaiveTime,
        slot_duration_minutes: i64,
        gap_duration_minutes: i64,
    ) -> Result<Vec<NaiveTime>, ScheduleError> {
        let minimum = self.config.min_slot_duration_minutes;
        if slot_duration_minutes < minimum {
            return Err(ScheduleError::InvalidSlotDuration {
                minutes: slot_duration_minutes,
                minimum,
            });
        }
        if gap_duration_minutes < 0 {
            return Err(ScheduleError::InvalidGapDuration {
                minutes: gap_duration_minutes,
            });
        }

        Ok(generator::calculate_possible_end_times(
            start_time,
            slot_duration_minutes,
            gap_duration_minutes,
        ))
    }

    /// Pre-commit contract check: whether the requested combination
    /// produces a slot sequence ending at or before `end_time`.
    pub fn validate_time_slot_combination(
        &self,
        start_time: NaiveTime,
        end_time: NaiveTime,
        slot_duration_minutes: i64,
        gap_duration_minutes: i64,
    ) -> Result<bool, ScheduleError> {
        generator::validate_time_slot_combination(
            start_time,
            end_time,
            slot_duration_minutes,
            gap_duration_minutes,
        )
    }

    /// Push a slot's start earlier and/or its end later. Booked
    /// neighbors veto the extension outright; available neighbors turn
    /// the result into a confirmation request unless `force_extension`
    /// is set, in which case they are removed.
    pub async fn extend_slot(
        &self,
        doctor_id: Uuid,
        request: SlotExtensionRequest,
    ) -> Result<SlotExtensionOutcome, ScheduleError> {
        debug!(
            "Extending slot {} for doctor {}",
            request.slot_id, doctor_id
        );

        let schedule = self
            .load_owned_schedule(request.day_schedule_id, doctor_id)
            .await?;
        self.ensure_not_past(schedule.date)?;

        let _guard = self.locks.acquire(doctor_id, schedule.date).await;
        let mut schedule = self
            .load_owned_schedule(request.day_schedule_id, doctor_id)
            .await?;

        let target = schedule
            .slot(request.slot_id)
            .cloned()
            .ok_or(ScheduleError::SlotNotFound {
                slot_id: request.slot_id,
            })?;

        let mut new_start = target.start_time;
        let mut new_end = target.end_time;
        if request.extend_start_time {
            new_start -= Duration::minutes(i64::from(request.start_extension_minutes));
        }
        if request.extend_end_time {
            new_end += Duration::minutes(i64::from(request.end_extension_minutes));
        }

        // Slots stay within their owning calendar date.
        let (day_start, day_end) = schedule.day_bounds();
        if new_start < day_start || new_end > day_end {
            return Err(ScheduleError::InvalidTimeCombination);
        }

        let mut conflicting_available = Vec::new();
        let mut conflicting_booked = Vec::new();
        for slot in &schedule.slots {
            if slot.id == target.id {
                continue;
            }
            if overlaps(new_start, new_end, slot.start_time, slot.end_time) {
                if slot.is_available {
                    conflicting_available.push(slot.clone());
                } else {
                    conflicting_booked.push(slot.clone());
                }
            }
        }

        if !conflicting_booked.is_empty() {
            return Err(ScheduleError::BookedSlotConflict {
                details: time_range_labels(&conflicting_booked),
            });
        }

        if !conflicting_available.is_empty() && !request.force_extension {
            let message = format!(
                "Extension will overlap with existing available slots: {}. These slots will be removed if you proceed",
                time_range_labels(&conflicting_available)
            );
            return Ok(SlotExtensionOutcome::needs_confirmation(
                message,
                conflicting_available,
            ));
        }

        let removed_ids: HashSet<Uuid> =
            conflicting_available.iter().map(|slot| slot.id).collect();
        let next_slots = schedule
            .slots
            .iter()
            .filter(|slot| !removed_ids.contains(&slot.id))
            .map(|slot| {
                let mut slot = slot.clone();
                if slot.id == target.id {
                    slot.start_time = new_start;
                    slot.end_time = new_end;
                }
                slot
            })
            .collect();
        schedule.replace_slots(next_slots);

        let saved = self
            .store
            .save(schedule)
            .await
            .map_err(ScheduleError::storage)?;

        if !conflicting_available.is_empty() {
            warn!(
                "Force extension of slot {} removed {} available slots",
                target.id,
                conflicting_available.len()
            );
        }

        Ok(SlotExtensionOutcome::extended(
            "Slot extended successfully".to_string(),
            conflicting_available,
            saved,
        ))
    }

    /// Shrink a slot from either end. Reduction cannot create overlaps,
    /// so it always succeeds while the slot keeps the minimum duration.
    pub async fn reduce_slot(
        &self,
        doctor_id: Uuid,
        day_schedule_id: Uuid,
        slot_id: Uuid,
        reduce_start_minutes: u32,
        reduce_end_minutes: u32,
    ) -> Result<DaySchedule, ScheduleError> {
        debug!("Reducing slot {} for doctor {}", slot_id, doctor_id);

        let schedule = self.load_owned_schedule(day_schedule_id, doctor_id).await?;
        self.ensure_not_past(schedule.date)?;

        let _guard = self.locks.acquire(doctor_id, schedule.date).await;
        let mut schedule = self.load_owned_schedule(day_schedule_id, doctor_id).await?;

        let target = schedule
            .slot(slot_id)
            .cloned()
            .ok_or(ScheduleError::SlotNotFound { slot_id })?;

        let new_start = target.start_time + Duration::minutes(i64::from(reduce_start_minutes));
        let new_end = target.end_time - Duration::minutes(i64::from(reduce_end_minutes));

        let minimum = self.config.min_slot_duration_minutes;
        if (new_end - new_start).num_minutes() < minimum {
            return Err(ScheduleError::MinimumDurationViolation { minimum });
        }

        let next_slots = schedule
            .slots
            .iter()
            .map(|slot| {
                let mut slot = slot.clone();
                if slot.id == target.id {
                    slot.start_time = new_start;
                    slot.end_time = new_end;
                }
                slot
            })
            .collect();
        schedule.replace_slots(next_slots);

        self.store
            .save(schedule)
            .await
            .map_err(ScheduleError::storage)
    }

    /// Delete one slot. A booked slot has its appointment cancelled and
    /// stays in the day as available time; an available slot is removed,
    /// and the day schedule goes with it when it was the last one.
    pub async fn delete_slot(
        &self,
        doctor_id: Uuid,
        day_schedule_id: Uuid,
        slot_id: Uuid,
    ) -> Result<DeleteSlotOutcome, ScheduleError> {
        debug!("Deleting slot {} for doctor {}", slot_id, doctor_id);

        let schedule = self.load_schedule_for(day_schedule_id, doctor_id).await?;
        self.ensure_not_past(schedule.date)?;

        let _guard = self.locks.acquire(doctor_id, schedule.date).await;
        let mut schedule = self.load_schedule_for(day_schedule_id, doctor_id).await?;

        let target = schedule
            .slot(slot_id)
            .cloned()
            .ok_or(ScheduleError::SlotNotFound { slot_id })?;

        if !target.is_available {
            if let Some(appointment_id) = target.appointment_id {
                let known = self
                    .appointments
                    .find_by_id(appointment_id)
                    .await
                    .map_err(ScheduleError::storage)?;
                match known {
                    Some(_) => self
                        .appointments
                        .mark_cancelled(appointment_id)
                        .await
                        .map_err(ScheduleError::storage)?,
                    None => warn!(
                        "Slot {} references missing appointment {}",
                        slot_id, appointment_id
                    ),
                }
            }

            let next_slots = schedule
                .slots
                .iter()
                .map(|slot| {
                    let mut slot = slot.clone();
                    if slot.id == target.id {
                        slot.release();
                    }
                    slot
                })
                .collect();
            schedule.replace_slots(next_slots);
            self.store
                .save(schedule)
                .await
                .map_err(ScheduleError::storage)?;

            return Ok(DeleteSlotOutcome::BookingCancelled {
                slot_id,
                appointment_id: target.appointment_id,
            });
        }

        let remaining: Vec<Slot> = schedule
            .slots
            .iter()
            .filter(|slot| slot.id != target.id)
            .cloned()
            .collect();

        let day_schedule_deleted = remaining.is_empty();
        if day_schedule_deleted {
            self.store
                .delete(schedule.id)
                .await
                .map_err(ScheduleError::storage)?;
        } else {
            schedule.replace_slots(remaining);
            self.store
                .save(schedule)
                .await
                .map_err(ScheduleError::storage)?;
        }

        Ok(DeleteSlotOutcome::SlotRemoved {
            slot_id,
            day_schedule_deleted,
        })
    }

    /// Remove every available slot overlapping the time-of-day range on
    /// each date in the date range. Booked slots are never touched.
    /// Returns how many slots were removed.
    pub async fn delete_slots_in_range(
        &self,
        doctor_id: Uuid,
        request: DeleteSlotsRequest,
    ) -> Result<usize, ScheduleError> {
        let today = self.clock.today();
        if request.start_date < today {
            return Err(ScheduleError::PastDateOperation {
                date: request.start_date,
            });
        }
        ensure_current_month(request.start_date, today)?;
        ensure_current_month(request.end_date, today)?;

        let schedules = self
            .store
            .find_by_doctor_and_date_range(doctor_id, request.start_date, request.end_date)
            .await
            .map_err(ScheduleError::storage)?;

        let mut removed_total = 0;
        for found in schedules {
            let _guard = self.locks.acquire(doctor_id, found.date).await;

            let fresh = self
                .store
                .find_by_doctor_and_date(doctor_id, found.date)
                .await
                .map_err(ScheduleError::storage)?;
            let Some(mut schedule) = fresh else {
                continue;
            };

            let range_start = schedule.date.and_time(request.start_time).and_utc();
            let range_end = schedule.date.and_time(request.end_time).and_utc();

            let kept: Vec<Slot> = schedule
                .slots
                .iter()
                .filter(|slot| {
                    !(slot.is_available
                        && overlaps(slot.start_time, slot.end_time, range_start, range_end))
                })
                .cloned()
                .collect();

            let removed = schedule.slots.len() - kept.len();
            if removed == 0 {
                continue;
            }
            removed_total += removed;

            if kept.is_empty() {
                self.store
                    .delete(schedule.id)
                    .await
                    .map_err(ScheduleError::storage)?;
            } else {
                schedule.replace_slots(kept);
                self.store
                    .save(schedule)
                    .await
                    .map_err(ScheduleError::storage)?;
            }
        }

        debug!(
            "Removed {} available slots for doctor {} between {} and {}",
            removed_total, doctor_id, request.start_date, request.end_date
        );
        Ok(removed_total)
    }

    /// Move a booking from one slot to another. The freed slot becomes
    /// available; the target slot takes over the appointment reference.
    pub async fn reschedule_appointment(
        &self,
        doctor_id: Uuid,
        request: RescheduleRequest,
    ) -> Result<RescheduleOutcome, ScheduleError> {
        debug!(
            "Rescheduling slot {} to slot {} for doctor {}",
            request.old_slot_id, request.new_slot_id, doctor_id
        );

        if request.old_day_schedule_id == request.new_day_schedule_id {
            return self.reschedule_within_day(doctor_id, &request).await;
        }

        let old_peek = self
            .load_schedule_for(request.old_day_schedule_id, doctor_id)
            .await?;
        let new_peek = self
            .load_schedule_for(request.new_day_schedule_id, doctor_id)
            .await?;
        self.ensure_not_past(old_peek.date)?;
        self.ensure_not_past(new_peek.date)?;

        let (_first_guard, _second_guard) = self
            .locks
            .acquire_pair(doctor_id, old_peek.date, new_peek.date)
            .await;

        let mut old_schedule = self
            .load_schedule_for(request.old_day_schedule_id, doctor_id)
            .await?;
        let mut new_schedule = self
            .load_schedule_for(request.new_day_schedule_id, doctor_id)
            .await?;

        let (appointment_id, freed_slot_id, booked_slot_id) = move_booking(
            &mut old_schedule,
            request.old_slot_id,
            &mut new_schedule,
            request.new_slot_id,
        )?;

        self.store
            .save(old_schedule)
            .await
            .map_err(ScheduleError::storage)?;
        self.store
            .save(new_schedule)
            .await
            .map_err(ScheduleError::storage)?;

        Ok(RescheduleOutcome {
            appointment_id,
            freed_slot_id,
            booked_slot_id,
        })
    }

    async fn reschedule_within_day(
        &self,
        doctor_id: Uuid,
        request: &RescheduleRequest,
    ) -> Result<RescheduleOutcome, ScheduleError> {
        let schedule = self
            .load_schedule_for(request.old_day_schedule_id, doctor_id)
            .await?;
        self.ensure_not_past(schedule.date)?;

        let _guard = self.locks.acquire(doctor_id, schedule.date).await;
        let mut schedule = self
            .load_schedule_for(request.old_day_schedule_id, doctor_id)
            .await?;

        let old_slot = schedule
            .slot(request.old_slot_id)
            .cloned()
            .ok_or(ScheduleError::SlotNotFound {
                slot_id: request.old_slot_id,
            })?;
        if old_slot.is_available {
            return Err(ScheduleError::CannotRescheduleAvailableSlot);
        }

        let new_slot = schedule
            .slot(request.new_slot_id)
            .cloned()
            .ok_or(ScheduleError::SlotNotFound {
                slot_id: request.new_slot_id,
            })?;
        if !new_slot.is_available {
            return Err(ScheduleError::SlotAlreadyBooked);
        }

        let appointment_id = old_slot.appointment_id;
        let next_slots = schedule
            .slots
            .iter()
            .map(|slot| {
                let mut slot = slot.clone();
                if slot.id == old_slot.id {
                    slot.release();
                } else if slot.id == new_slot.id {
                    slot.appointment_id = appointment_id;
                    slot.is_available = false;
                }
                slot
            })
            .collect();
        schedule.replace_slots(next_slots);

        self.store
            .save(schedule)
            .await
            .map_err(ScheduleError::storage)?;

        Ok(RescheduleOutcome {
            appointment_id,
            freed_slot_id: old_slot.id,
            booked_slot_id: new_slot.id,
        })
    }

    // Private helpers

    fn validate_slot_request(&self, request: &ScheduleSlotRequest) -> Result<(), ScheduleError> {
        let minimum = self.config.min_slot_duration_minutes;
        if request.slot_duration_minutes < minimum {
            return Err(ScheduleError::InvalidSlotDuration {
                minutes: request.slot_duration_minutes,
                minimum,
            });
        }

        if request.gap_duration_minutes < 0 {
            return Err(ScheduleError::InvalidGapDuration {
                minutes: request.gap_duration_minutes,
            });
        }

        if !generator::validate_time_slot_combination(
            request.start_time,
            request.end_time,
            request.slot_duration_minutes,
            request.gap_duration_minutes,
        )? {
            return Err(ScheduleError::InvalidTimeCombination);
        }

        let today = self.clock.today();
        if request.start_date < today {
            return Err(ScheduleError::PastDateOperation {
                date: request.start_date,
            });
        }

        let last_day = last_day_of_month(today);
        if request.start_date > last_day {
            return Err(ScheduleError::NextMonthRestriction {
                date: request.start_date,
            });
        }

        if request.is_recurring() {
            if let Some(end_date) = request.recurring_end_date {
                if end_date > last_day {
                    return Err(ScheduleError::NextMonthRestriction { date: end_date });
                }
            }
        }

        Ok(())
    }

    fn create_day_schedules(
        &self,
        doctor_id: Uuid,
        request: &ScheduleSlotRequest,
    ) -> Vec<DaySchedule> {
        let end_date = if request.is_recurring() {
            request.recurring_end_date.unwrap_or(request.start_date)
        } else {
            request.start_date
        };

        let mut schedules = Vec::new();
        let mut current = request.start_date;
        while current <= end_date {
            let skipped = request.is_recurring()
                && request.recurring_days.as_ref().is_some_and(|days| {
                    !days.contains(&current.weekday().num_days_from_sunday())
                });

            if !skipped {
                let slots = generator::generate_slots_for_time_range(
                    request.start_time,
                    request.end_time,
                    request.slot_duration_minutes,
                    request.gap_duration_minutes,
                    current,
                );
                if !slots.is_empty() {
                    schedules.push(DaySchedule::new(doctor_id, current, slots));
                }
            }

            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }

        schedules
    }

    /// Lookup used by extend/reduce: a schedule owned by another doctor
    /// is an authorization failure, not a miss.
    async fn load_owned_schedule(
        &self,
        id: Uuid,
        doctor_id: Uuid,
    ) -> Result<DaySchedule, ScheduleError> {
        let schedule = self
            .store
            .find_by_id(id)
            .await
            .map_err(ScheduleError::storage)?
            .ok_or(ScheduleError::DayScheduleNotFound)?;

        if schedule.doctor_id != doctor_id {
            return Err(ScheduleError::UnauthorizedAccess { doctor_id });
        }

        Ok(schedule)
    }

    /// Lookup scoped to the doctor: a foreign schedule is simply not
    /// found.
    async fn load_schedule_for(
        &self,
        id: Uuid,
        doctor_id: Uuid,
    ) -> Result<DaySchedule, ScheduleError> {
        self.store
            .find_by_id_and_doctor(id, doctor_id)
            .await
            .map_err(ScheduleError::storage)?
            .ok_or(ScheduleError::DayScheduleNotFound)
    }

    fn ensure_not_past(&self, date: NaiveDate) -> Result<(), ScheduleError> {
        if date < self.clock.today() {
            return Err(ScheduleError::PastDateOperation { date });
        }
        Ok(())
    }
}

fn move_booking(
    old_schedule: &mut DaySchedule,
    old_slot_id: Uuid,
    new_schedule: &mut DaySchedule,
    new_slot_id: Uuid,
) -> Result<(Option<Uuid>, Uuid, Uuid), ScheduleError> {
    let old_slot = old_schedule
        .slot(old_slot_id)
        .cloned()
        .ok_or(ScheduleError::SlotNotFound {
            slot_id: old_slot_id,
        })?;
    if old_slot.is_available {
        return Err(ScheduleError::CannotRescheduleAvailableSlot);
    }

    let new_slot = new_schedule
        .slot(new_slot_id)
        .cloned()
        .ok_or(ScheduleError::SlotNotFound {
            slot_id: new_slot_id,
        })?;
    if !new_slot.is_available {
        return Err(ScheduleError::SlotAlreadyBooked);
    }

    let appointment_id = old_slot.appointment_id;

    let freed = old_schedule
        .slots
        .iter()
        .map(|slot| {
            let mut slot = slot.clone();
            if slot.id == old_slot_id {
                slot.release();
            }
            slot
        })
        .collect();
    old_schedule.replace_slots(freed);

    let booked = new_schedule
        .slots
        .iter()
        .map(|slot| {
            let mut slot = slot.clone();
            if slot.id == new_slot_id {
                slot.appointment_id = appointment_id;
                slot.is_available = false;
            }
            slot
        })
        .collect();
    new_schedule.replace_slots(booked);

    Ok((appointment_id, old_slot_id, new_slot_id))
}

fn time_range_labels(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(Slot::time_range_label)
        .collect::<Vec<_>>()
        .join(", ")
}

fn ensure_current_month(date: NaiveDate, today: NaiveDate) -> Result<(), ScheduleError> {
    let target = (date.year(), date.month());
    let current = (today.year(), today.month());
    if target < current {
        return Err(ScheduleError::PastDateOperation { date });
    }
    if target > current {
        return Err(ScheduleError::NextMonthRestriction { date });
    }
    Ok(())
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first_of_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };

    first_of_next
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_day_of_month() {
        let mid_july = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        assert_eq!(
            last_day_of_month(mid_july),
            NaiveDate::from_ymd_opt(2025, 7, 31).unwrap()
        );

        let february = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(
            last_day_of_month(february),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );

        let december = NaiveDate::from_ymd_opt(2025, 12, 5).unwrap();
        assert_eq!(
            last_day_of_month(december),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_ensure_current_month_boundaries() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();

        assert!(ensure_current_month(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(), today).is_ok());
        assert_eq!(
            ensure_current_month(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(), today),
            Err(ScheduleError::NextMonthRestriction {
                date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
            })
        );
        assert_eq!(
            ensure_current_month(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(), today),
            Err(ScheduleError::PastDateOperation {
                date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
            })
        );
    }
}
