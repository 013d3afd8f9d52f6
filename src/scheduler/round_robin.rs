use super::{Policy, Process, QueueId, Scheduler, SimCtx};

/// Whole-job round robin: a dispatched process runs its full size, then goes
/// back to the tail for another turn. There is no time quantum.
pub struct RoundRobinScheduler {
    queue: QueueId,
}

impl Scheduler for RoundRobinScheduler {
    fn init(ctx: &mut SimCtx) -> Self {
        Self {
            queue: ctx.create_queue_fifo(),
        }
    }

    fn policy(&self) -> Policy {
        Policy::RoundRobin
    }

    fn queue(&self) -> QueueId {
        self.queue
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: Process) {
        ctx.queue_push_back(self.queue, process);
    }

    fn stopping(&mut self, ctx: &mut SimCtx, process: Process) -> bool {
        ctx.queue_push_back(self.queue, process);
        true
    }
}
