pub mod config;
pub mod core;
pub mod scheduler;
pub mod sim;
pub mod trace;

pub use config::{ConfigError, Mode, SimConfig};
pub use crate::core::{Process, ProcessId, SimEvent, Ticks};
pub use scheduler::{Policy, Scheduler};
pub use sim::{Cycle, Sim, SimError, SimState, StopSignal};
