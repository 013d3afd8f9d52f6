use tracing::debug;

use super::{
    event::SimEvent,
    observer::Observer,
    state::{Process, SimCtx, Ticks},
};
use crate::scheduler::{Policy, Scheduler};

/// One scheduler per active policy, all sharing a context and clock.
pub struct SchedCore {
    pub ctx: SimCtx,
    lanes: Vec<Box<dyn Scheduler>>,
    observer: Observer,
}

impl SchedCore {
    pub fn new(policies: &[Policy]) -> Self {
        let mut ctx = SimCtx::new();
        let lanes = policies
            .iter()
            .map(|policy| policy.scheduler(&mut ctx))
            .collect();
        Self {
            ctx,
            lanes,
            observer: Observer::new(),
        }
    }

    pub fn policies(&self) -> impl Iterator<Item = Policy> + '_ {
        self.lanes.iter().map(|lane| lane.policy())
    }

    /// Hand `process` to the lane running `policy`. `None` if no such lane.
    pub fn admit(&mut self, policy: Policy, process: Process) -> Option<SimEvent> {
        let ctx = &mut self.ctx;
        let lane = self.lanes.iter_mut().find(|lane| lane.policy() == policy)?;
        lane.enqueue(ctx, process);
        debug!(%policy, id = process.id, size = process.size, "admitted");
        Some(SimEvent::Admitted { policy, process })
    }

    /// Dispatch at most one process per lane, in lane order. Each dispatch
    /// advances the shared clock by the process size.
    pub fn tick(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        for lane in &mut self.lanes {
            let policy = lane.policy();
            let Some(process) = lane.dispatch(&mut self.ctx) else {
                events.push(SimEvent::LaneIdle { policy });
                continue;
            };

            let started_at = self.ctx.now;
            self.ctx.advance_time(process.size);
            debug!(%policy, id = process.id, size = process.size, started_at, "dispatched");
            events.push(SimEvent::Dispatched {
                policy,
                process,
                started_at,
            });

            if lane.stopping(&mut self.ctx, process) {
                events.push(SimEvent::Requeued { policy, process });
            }
        }
        self.observer.observe(&self.ctx);
        events
    }

    pub fn snapshot(&self, policy: Policy) -> Vec<Process> {
        self.lanes
            .iter()
            .find(|lane| lane.policy() == policy)
            .map(|lane| self.ctx.queue_snapshot(lane.queue()))
            .unwrap_or_default()
    }

    pub fn queue_len(&self, policy: Policy) -> usize {
        self.lanes
            .iter()
            .find(|lane| lane.policy() == policy)
            .map_or(0, |lane| self.ctx.queue_len(lane.queue()))
    }

    pub fn is_idle(&self) -> bool {
        self.lanes
            .iter()
            .all(|lane| self.ctx.queue_len(lane.queue()) == 0)
    }

    /// Release every queued process in every lane. Returns how many were
    /// dropped; calling again returns 0.
    pub fn exit(&mut self) -> usize {
        let mut released = 0;
        for lane in &mut self.lanes {
            released += lane.exit(&mut self.ctx);
        }
        released
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_robin_redispatches_lone_process_every_tick() {
        let mut core = SchedCore::new(&[Policy::RoundRobin]);
        core.admit(Policy::RoundRobin, Process::new(1, 4));

        for turn in 1..=5 {
            let events = core.tick();
            assert_eq!(
                events,
                vec![
                    SimEvent::Dispatched {
                        policy: Policy::RoundRobin,
                        process: Process::new(1, 4),
                        started_at: (turn - 1) * 4,
                    },
                    SimEvent::Requeued {
                        policy: Policy::RoundRobin,
                        process: Process::new(1, 4),
                    },
                ]
            );
            assert_eq!(core.now(), turn * 4);
            assert_eq!(core.snapshot(Policy::RoundRobin), vec![Process::new(1, 4)]);
        }
    }

    #[test]
    fn fcfs_discards_dispatched_process() {
        let mut core = SchedCore::new(&[Policy::Fcfs]);
        core.admit(Policy::Fcfs, Process::new(1, 3));

        core.tick();
        assert_eq!(core.now(), 3);
        assert!(core.snapshot(Policy::Fcfs).is_empty());

        assert_eq!(core.tick(), vec![SimEvent::LaneIdle { policy: Policy::Fcfs }]);
        assert_eq!(core.now(), 3);
    }

    #[test]
    fn parallel_lanes_share_one_clock() {
        let mut core = SchedCore::new(&Policy::ALL);
        core.admit(Policy::Fcfs, Process::new(1, 2));
        core.admit(Policy::Sjf, Process::new(2, 3));
        core.admit(Policy::RoundRobin, Process::new(3, 5));

        let started: Vec<Ticks> = core
            .tick()
            .into_iter()
            .filter_map(|event| match event {
                SimEvent::Dispatched { started_at, .. } => Some(started_at),
                _ => None,
            })
            .collect();

        assert_eq!(started, vec![0, 2, 5]);
        assert_eq!(core.now(), 10);
    }

    #[test]
    fn admit_to_missing_lane_is_refused() {
        let mut core = SchedCore::new(&[Policy::Sjf]);
        assert!(core.admit(Policy::Fcfs, Process::new(1, 1)).is_none());
        assert!(core.is_idle());
    }

    #[test]
    fn exit_drains_all_lanes() {
        let mut core = SchedCore::new(&Policy::ALL);
        core.admit(Policy::Fcfs, Process::new(1, 2));
        core.admit(Policy::Sjf, Process::new(2, 3));
        core.admit(Policy::Sjf, Process::new(3, 1));

        assert_eq!(core.exit(), 3);
        assert!(core.is_idle());
        assert_eq!(core.exit(), 0);
    }
}
