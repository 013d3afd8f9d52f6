use super::state::{QueueKind, SimCtx, Ticks};

/// Post-cycle consistency checks. Compiled to bookkeeping only in release.
#[derive(Debug, Default)]
pub struct Observer {
    last_now: Ticks,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        debug_assert!(
            ctx.now >= self.last_now,
            "Clock moved backwards from {} to {}",
            self.last_now,
            ctx.now
        );
        self.last_now = ctx.now;

        for (queue_id, queue) in &ctx.queues {
            debug_assert_eq!(
                queue.front().is_none(),
                queue.back().is_none(),
                "Queue {queue_id:?} has only one of front/back"
            );

            if queue.kind() == QueueKind::Ordered {
                let procs = queue.snapshot();
                debug_assert!(
                    procs.windows(2).all(|w| w[0].size <= w[1].size),
                    "Ordered queue {queue_id:?} out of size order: {procs:?}"
                );
            }

            for process in queue.iter() {
                debug_assert!(process.size > 0, "Process {} has zero size", process.id);
                debug_assert_eq!(
                    ctx.proc_to_queue.get(&process.id),
                    Some(&queue_id),
                    "Process {} in queue {queue_id:?} without matching membership",
                    process.id
                );
            }
        }

        for (&id, &queue_id) in &ctx.proc_to_queue {
            if let Some(queue) = ctx.queues.get(queue_id) {
                debug_assert!(
                    queue.contains(id),
                    "proc_to_queue claims process {id} in {queue_id:?}, but queue does not contain it"
                );
            } else {
                debug_assert!(false, "proc_to_queue references unknown queue {queue_id:?}");
            }
        }
    }
}
