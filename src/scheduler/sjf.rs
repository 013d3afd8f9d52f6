use super::{Policy, Process, QueueId, Scheduler, SimCtx};

/// Non-preemptive shortest-job-first. The queue is kept sorted by size on
/// admission so dispatch is always a pop from the front.
pub struct SjfScheduler {
    queue: QueueId,
}

impl Scheduler for SjfScheduler {
    fn init(ctx: &mut SimCtx) -> Self {
        Self {
            queue: ctx.create_queue_ordered(),
        }
    }

    fn policy(&self) -> Policy {
        Policy::Sjf
    }

    fn queue(&self) -> QueueId {
        self.queue
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: Process) {
        ctx.queue_insert_ordered(self.queue, process);
    }
}
