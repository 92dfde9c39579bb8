pub mod scheduler;

pub use scheduler::{FlowScheduler, SchedulerState};
