use proptest::prelude::*;

use sched_sim::{
    Policy, Process, Sim, SimState, StopSignal,
    core::RunQueue,
    sim::{NoArrivals, NoDelay, RandomWorkload, Reporter},
};

struct Discard;

impl Reporter for Discard {
    fn cycle(&mut self, _cycle: &sched_sim::Cycle) -> std::io::Result<()> {
        Ok(())
    }
}

fn processes(sizes: &[u64]) -> Vec<Process> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &size)| Process::new(i as u64 + 1, size))
        .collect()
}

fn any_policy() -> impl Strategy<Value = Policy> {
    prop_oneof![
        Just(Policy::Fcfs),
        Just(Policy::Sjf),
        Just(Policy::RoundRobin),
    ]
}

proptest! {
    #[test]
    fn fifo_returns_admission_order(sizes in prop::collection::vec(1u64..=10, 0..64)) {
        let input = processes(&sizes);
        let mut queue = RunQueue::new_fifo();
        for &process in &input {
            queue.enqueue(process);
        }

        let mut output = Vec::new();
        while let Some(process) = queue.dequeue() {
            output.push(process);
        }
        prop_assert_eq!(output, input);
        prop_assert!(queue.front().is_none() && queue.back().is_none());
    }

    #[test]
    fn ordered_queue_is_a_stable_sort(sizes in prop::collection::vec(1u64..=10, 0..64)) {
        let input = processes(&sizes);
        let mut queue = RunQueue::new_ordered();
        for &process in &input {
            queue.admit(process);
        }

        let mut expected = input.clone();
        expected.sort_by_key(|process| process.size);
        prop_assert_eq!(queue.snapshot(), expected);
    }

    #[test]
    fn destroy_all_twice_leaves_queue_empty(sizes in prop::collection::vec(1u64..=10, 0..16)) {
        let mut queue = RunQueue::new_ordered();
        for process in processes(&sizes) {
            queue.admit(process);
        }

        prop_assert_eq!(queue.destroy_all().len(), sizes.len());
        prop_assert!(queue.is_empty());
        prop_assert!(queue.destroy_all().is_empty());
        prop_assert!(queue.is_empty());
    }

    #[test]
    fn round_robin_lone_process_advances_clock_by_its_size(size in 1u64..=10, turns in 1u64..50) {
        let mut sim = Sim::new(&[Policy::RoundRobin], u64::MAX, NoArrivals);
        let seeded = sim.seed(Policy::RoundRobin, size).unwrap();

        for turn in 1..=turns {
            let cycle = sim.step().unwrap();
            let dispatched: Vec<Process> = cycle.dispatches().map(|(_, p, _)| p).collect();
            prop_assert_eq!(dispatched, vec![seeded]);
            prop_assert_eq!(cycle.queue(Policy::RoundRobin), &[seeded]);
            prop_assert_eq!(sim.now(), turn * size);
        }
    }

    #[test]
    fn run_terminates_within_horizon_cycles(
        horizon in 0u64..300,
        seed in any::<u64>(),
        policy in any_policy(),
        parallel in any::<bool>(),
    ) {
        let policies = if parallel { Policy::ALL.to_vec() } else { vec![policy] };
        let mut sim = Sim::new(&policies, horizon, RandomWorkload::seeded(seed, 1..=10));
        let stats = sim.run(&mut Discard, &NoDelay, &StopSignal::new()).unwrap().clone();

        prop_assert!(stats.cycles <= horizon);
        prop_assert!(stats.final_clock >= horizon);
        prop_assert_eq!(sim.state(), SimState::Done);
        prop_assert!(sim.core.is_idle());
    }
}
