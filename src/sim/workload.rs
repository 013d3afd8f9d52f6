use rand::prelude::*;
use std::collections::VecDeque;
use std::ops::RangeInclusive;

use crate::core::{Process, ProcessId, Ticks};

pub const DEFAULT_SIZES: RangeInclusive<Ticks> = 1..=10;

/// Supplies new work, one call per lane per cycle. The engine picks the
/// identity; a source returning `None` does not consume it.
pub trait WorkSource {
    fn generate(&mut self, id: ProcessId) -> Option<Process>;
}

/// Uniformly sized synthetic processes.
#[derive(Debug)]
pub struct RandomWorkload {
    rng: StdRng,
    sizes: RangeInclusive<Ticks>,
}

impl RandomWorkload {
    pub fn seeded(seed: u64, sizes: RangeInclusive<Ticks>) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), sizes)
    }

    pub fn from_entropy(sizes: RangeInclusive<Ticks>) -> Self {
        Self::with_rng(StdRng::from_os_rng(), sizes)
    }

    fn with_rng(rng: StdRng, sizes: RangeInclusive<Ticks>) -> Self {
        assert!(
            !sizes.is_empty() && *sizes.start() > 0,
            "Process sizes must be a non-empty range of positive ticks"
        );
        Self { rng, sizes }
    }
}

impl WorkSource for RandomWorkload {
    fn generate(&mut self, id: ProcessId) -> Option<Process> {
        let size = self.rng.random_range(self.sizes.clone());
        Some(Process::new(id, size))
    }
}

/// Hands out a fixed list of sizes in order, then nothing.
#[derive(Debug, Default)]
pub struct ScriptedWorkload {
    sizes: VecDeque<Ticks>,
}

impl ScriptedWorkload {
    pub fn new(sizes: impl IntoIterator<Item = Ticks>) -> Self {
        let sizes: VecDeque<Ticks> = sizes.into_iter().collect();
        assert!(
            sizes.iter().all(|&size| size > 0),
            "Process sizes must be positive ticks"
        );
        Self { sizes }
    }
}

impl WorkSource for ScriptedWorkload {
    fn generate(&mut self, id: ProcessId) -> Option<Process> {
        self.sizes.pop_front().map(|size| Process::new(id, size))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoArrivals;

impl WorkSource for NoArrivals {
    fn generate(&mut self, _id: ProcessId) -> Option<Process> {
        None
    }
}
