use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use super::{
    SimError,
    pacing::Pacer,
    report::Reporter,
    stats::SimStats,
    workload::WorkSource,
};
use crate::{
    core::{Process, ProcessId, SchedCore, SimEvent, Ticks},
    scheduler::Policy,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Running,
    Draining,
    Done,
}

/// Everything a reporter needs about one completed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub number: u64,
    pub events: Vec<SimEvent>,
    // Every policy in display order; lanes not running show empty
    pub queues: Vec<(Policy, Vec<Process>)>,
}

impl Cycle {
    pub fn dispatches(&self) -> impl Iterator<Item = (Policy, Process, Ticks)> + '_ {
        self.events.iter().filter_map(|event| match *event {
            SimEvent::Dispatched {
                policy,
                process,
                started_at,
            } => Some((policy, process, started_at)),
            _ => None,
        })
    }

    pub fn queue(&self, policy: Policy) -> &[Process] {
        self.queues
            .iter()
            .find(|(p, _)| *p == policy)
            .map(|(_, procs)| procs.as_slice())
            .unwrap_or_default()
    }
}

/// Shared flag asking a running simulation to wind down.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Sim<W: WorkSource> {
    pub core: SchedCore,
    source: W,
    horizon: Ticks,
    state: SimState,
    cycle: u64,
    // Admission clock of processes not yet dispatched for the first time
    arrivals: FxHashMap<ProcessId, Ticks>,
    stats: SimStats,
}

impl<W: WorkSource> Sim<W> {
    pub fn new(policies: &[Policy], horizon: Ticks, source: W) -> Self {
        assert!(!policies.is_empty(), "Simulation requires at least one policy");
        let core = SchedCore::new(policies);
        let stats = SimStats::new(core.policies());
        Self {
            core,
            source,
            horizon,
            state: SimState::Running,
            cycle: 0,
            arrivals: FxHashMap::default(),
            stats,
        }
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn now(&self) -> Ticks {
        self.core.now()
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Admit a process of `size` to `policy`'s queue outside the normal
    /// arrival path. `None` if no lane runs `policy`.
    pub fn seed(&mut self, policy: Policy, size: Ticks) -> Option<Process> {
        assert!(size > 0, "Process size must be positive");
        if !self.core.policies().any(|p| p == policy) {
            return None;
        }
        let process = Process::new(self.core.ctx.claim_pid(), size);
        let event = self.core.admit(policy, process)?;
        self.record_admission(&event);
        Some(process)
    }

    /// Run one cycle: arrivals, at most one dispatch per lane, RR requeue.
    /// The cycle that carries the clock to the horizon moves the state to
    /// `Draining`; the next call tears the queues down and returns `None`.
    pub fn step(&mut self) -> Option<Cycle> {
        match self.state {
            SimState::Running if self.core.now() >= self.horizon => {
                self.drain();
                return None;
            }
            SimState::Running => {}
            SimState::Draining => {
                self.drain();
                return None;
            }
            SimState::Done => return None,
        }

        self.cycle += 1;
        let before = self.core.now();
        let mut events = self.handle_arrivals();
        events.extend(self.core.tick());
        self.record_tick(&events);

        if self.core.now() == before {
            // Nothing can ever move the clock again
            warn!(cycle = self.cycle, now = self.core.now(), "no runnable work; stopping");
            self.state = SimState::Draining;
        } else if self.core.now() >= self.horizon {
            debug!(cycle = self.cycle, now = self.core.now(), "horizon reached");
            self.state = SimState::Draining;
        }

        let queues = Policy::ALL
            .iter()
            .map(|&policy| (policy, self.core.snapshot(policy)))
            .collect();

        Some(Cycle {
            number: self.cycle,
            events,
            queues,
        })
    }

    /// Stop generating and dispatching. The next `step` drains.
    pub fn stop(&mut self) {
        if self.state == SimState::Running {
            info!(cycle = self.cycle, now = self.core.now(), "stop requested");
            self.state = SimState::Draining;
        }
    }

    /// Drive the simulation to `Done`, reporting each cycle and pacing between
    /// them. Queues are always torn down, even on a report failure.
    pub fn run<R, P>(
        &mut self,
        reporter: &mut R,
        pacer: &P,
        stop: &StopSignal,
    ) -> Result<&SimStats, SimError>
    where
        R: Reporter + ?Sized,
        P: Pacer + ?Sized,
    {
        info!(horizon = self.horizon, "simulation starting");
        loop {
            if stop.is_raised() {
                self.stop();
            }

            let Some(cycle) = self.step() else {
                break;
            };

            if let Err(err) = reporter.cycle(&cycle) {
                self.stop();
                self.drain();
                return Err(err.into());
            }

            if self.state == SimState::Running && !stop.is_raised() {
                pacer.pace();
            }
        }

        reporter.finish(&self.stats)?;
        Ok(&self.stats)
    }

    fn handle_arrivals(&mut self) -> Vec<SimEvent> {
        let policies: Vec<Policy> = self.core.policies().collect();
        let mut events = Vec::with_capacity(policies.len());

        for policy in policies {
            let id = self.core.ctx.peek_pid();
            let Some(process) = self.source.generate(id) else {
                continue;
            };
            debug_assert_eq!(process.id, id, "Work source ignored the offered identity");
            self.core.ctx.claim_pid();

            if let Some(event) = self.core.admit(policy, process) {
                self.record_admission(&event);
                events.push(event);
            }
        }

        events
    }

    fn record_admission(&mut self, event: &SimEvent) {
        if let SimEvent::Admitted { policy, process } = *event {
            self.arrivals.insert(process.id, self.core.now());
            if let Some(lane) = self.stats.lane_mut(policy) {
                lane.admitted += 1;
            }
        }
    }

    fn record_tick(&mut self, events: &[SimEvent]) {
        self.stats.cycles = self.cycle;
        self.stats.final_clock = self.core.now();

        for event in events {
            if let SimEvent::Dispatched {
                policy,
                process,
                started_at,
            } = *event
            {
                let first_arrival = self.arrivals.remove(&process.id);
                if let Some(lane) = self.stats.lane_mut(policy) {
                    lane.dispatches += 1;
                    lane.busy += process.size;
                    if let Some(arrived) = first_arrival {
                        lane.record_response(started_at.saturating_sub(arrived));
                    }
                }
            }
        }

        for lane in &mut self.stats.lanes {
            lane.peak_queue_len = lane.peak_queue_len.max(self.core.queue_len(lane.policy));
        }
    }

    fn drain(&mut self) {
        if self.state == SimState::Done {
            return;
        }
        self.state = SimState::Draining;
        let released = self.core.exit();
        self.arrivals.clear();
        self.stats.released += released;
        self.stats.final_clock = self.core.now();
        self.state = SimState::Done;
        info!(
            cycles = self.cycle,
            now = self.core.now(),
            released,
            "simulation done"
        );
    }
}
