use super::{Policy, Process, QueueId, Scheduler, SimCtx};

pub struct FcfsScheduler {
    queue: QueueId,
}

impl Scheduler for FcfsScheduler {
    fn init(ctx: &mut SimCtx) -> Self {
        Self {
            queue: ctx.create_queue_fifo(),
        }
    }

    fn policy(&self) -> Policy {
        Policy::Fcfs
    }

    fn queue(&self) -> QueueId {
        self.queue
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, process: Process) {
        ctx.queue_push_back(self.queue, process);
    }
}
