pub mod config;
pub mod domain;
pub mod engine;
pub mod logger;
pub mod market;
pub mod sink;
pub mod stats;

pub use config::{BurstSizeRange, ConfigError, GenerationConfig};
pub use domain::{Order, OrderSide};
pub use engine::{FlowScheduler, SchedulerState};
pub use sink::{OrderSink, OutputFormat, SinkError};
pub use stats::FlowSummary;
