pub mod generator;
pub mod interval;
pub mod locks;
pub mod merge;
pub mod schedule;

pub use locks::ScheduleLockRegistry;
pub use schedule::ScheduleService;
