use crate::core::{Process, Ticks};
use crate::scheduler::Policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    Admitted {
        policy: Policy,
        process: Process,
    },
    // `started_at` is the clock before this dispatch advanced it
    Dispatched {
        policy: Policy,
        process: Process,
        started_at: Ticks,
    },
    Requeued {
        policy: Policy,
        process: Process,
    },
    // Queue still empty after admission
    LaneIdle {
        policy: Policy,
    },
}
