pub mod fcfs;
pub mod round_robin;
pub mod sjf;

use std::fmt;

use crate::core::state::{Process, QueueId, SimCtx};
pub use fcfs::FcfsScheduler;
pub use round_robin::RoundRobinScheduler;
pub use sjf::SjfScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    Fcfs,
    Sjf,
    RoundRobin,
}

impl Policy {
    /// Lane order used in parallel mode and in the queue-state block.
    pub const ALL: [Policy; 3] = [Policy::Fcfs, Policy::Sjf, Policy::RoundRobin];

    /// Menu number: 1 = FCFS, 2 = SJF, 3 = Round-Robin.
    pub fn from_selection(selection: i64) -> Option<Self> {
        match selection {
            1 => Some(Self::Fcfs),
            2 => Some(Self::Sjf),
            3 => Some(Self::RoundRobin),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjf => "SJF",
            Self::RoundRobin => "Round-Robin",
        }
    }

    pub fn scheduler(self, ctx: &mut SimCtx) -> Box<dyn Scheduler> {
        match self {
            Self::Fcfs => Box::new(FcfsScheduler::init(ctx)),
            Self::Sjf => Box::new(SjfScheduler::init(ctx)),
            Self::RoundRobin => Box::new(RoundRobinScheduler::init(ctx)),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-policy hooks invoked by the engine each cycle.
pub trait Scheduler {
    fn init(ctx: &mut SimCtx) -> Self
    where
        Self: Sized;

    fn policy(&self) -> Policy;

    /// Queue owned by this scheduler.
    fn queue(&self) -> QueueId;

    fn enqueue(&mut self, ctx: &mut SimCtx, process: Process);

    fn dispatch(&mut self, ctx: &mut SimCtx) -> Option<Process> {
        ctx.queue_pop_front(self.queue())
    }

    /// Called once the dispatched process has run to the end of its turn.
    /// Returns true when the process was put back on a queue.
    fn stopping(&mut self, _ctx: &mut SimCtx, _process: Process) -> bool {
        false
    }

    fn exit(&mut self, ctx: &mut SimCtx) -> usize {
        ctx.queue_destroy_all(self.queue())
    }
}
