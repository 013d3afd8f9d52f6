use average::{Estimate, Mean};

use crate::core::Ticks;
use crate::scheduler::Policy;

#[derive(Debug, Clone)]
pub struct PolicyStats {
    pub policy: Policy,
    pub admitted: u64,
    pub dispatches: u64,
    pub busy: Ticks,
    pub peak_queue_len: usize,
    // First dispatch minus admission clock, one sample per process
    response: Mean,
}

impl PolicyStats {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            admitted: 0,
            dispatches: 0,
            busy: 0,
            peak_queue_len: 0,
            response: Mean::new(),
        }
    }

    pub fn record_response(&mut self, ticks: Ticks) {
        self.response.add(ticks as f64);
    }

    pub fn responses(&self) -> u64 {
        self.response.len()
    }

    /// `None` until some process has been dispatched.
    pub fn mean_response(&self) -> Option<f64> {
        (!self.response.is_empty()).then(|| self.response.estimate())
    }
}

#[derive(Debug, Clone)]
pub struct SimStats {
    pub cycles: u64,
    pub final_clock: Ticks,
    pub released: usize,
    pub lanes: Vec<PolicyStats>,
}

impl SimStats {
    pub fn new(policies: impl IntoIterator<Item = Policy>) -> Self {
        Self {
            cycles: 0,
            final_clock: 0,
            released: 0,
            lanes: policies.into_iter().map(PolicyStats::new).collect(),
        }
    }

    pub fn lane(&self, policy: Policy) -> Option<&PolicyStats> {
        self.lanes.iter().find(|lane| lane.policy == policy)
    }

    pub fn lane_mut(&mut self, policy: Policy) -> Option<&mut PolicyStats> {
        self.lanes.iter_mut().find(|lane| lane.policy == policy)
    }
}
