pub mod driver;
pub mod pacing;
pub mod report;
pub mod stats;
pub mod workload;

use thiserror::Error;

pub use driver::{Cycle, Sim, SimState, StopSignal};
pub use pacing::{FixedDelay, NoDelay, Pacer};
pub use report::{ConsoleReporter, Reporter};
pub use stats::{PolicyStats, SimStats};
pub use workload::{NoArrivals, RandomWorkload, ScriptedWorkload, WorkSource};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to write simulation report: {0}")]
    Report(#[from] std::io::Error),
}
