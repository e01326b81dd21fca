pub mod error;
pub mod models;
pub mod services;
pub mod store;

// Re-export the public surface for embedding callers
pub use error::ScheduleError;
pub use models::*;
pub use services::{ScheduleLockRegistry, ScheduleService};
pub use store::{
    AppointmentDirectory, Clock, DayScheduleStore, FixedClock, InMemoryAppointmentDirectory,
    InMemoryDayScheduleStore, SystemClock,
};
