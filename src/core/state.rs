use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

// Identities start at 1 and are never reused
pub type ProcessId = u64;
pub type Ticks = u64;
new_key_type! {
    pub struct QueueId;
}

/// A unit of synthetic work. Immutable once generated; only its position
/// changes as it moves between queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Process {
    pub id: ProcessId,
    pub size: Ticks,
}

impl Process {
    pub fn new(id: ProcessId, size: Ticks) -> Self {
        Self { id, size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    Fifo,
    Ordered,
}

/// Run queue storage.
///
/// `Fifo` admits at the tail. `Ordered` keeps ascending `size`, placing a new
/// arrival after every queued process of equal size, so ties dispatch in
/// arrival order.
#[derive(Debug, Clone)]
pub enum RunQueue {
    Fifo { procs: VecDeque<Process> },
    Ordered { procs: VecDeque<Process> },
}

impl RunQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            procs: VecDeque::new(),
        }
    }

    pub fn new_ordered() -> Self {
        Self::Ordered {
            procs: VecDeque::new(),
        }
    }

    pub fn kind(&self) -> QueueKind {
        match self {
            Self::Fifo { .. } => QueueKind::Fifo,
            Self::Ordered { .. } => QueueKind::Ordered,
        }
    }

    fn procs(&self) -> &VecDeque<Process> {
        match self {
            Self::Fifo { procs } | Self::Ordered { procs } => procs,
        }
    }

    fn procs_mut(&mut self) -> &mut VecDeque<Process> {
        match self {
            Self::Fifo { procs } | Self::Ordered { procs } => procs,
        }
    }

    /// Append at the tail regardless of kind.
    pub fn enqueue(&mut self, process: Process) {
        self.procs_mut().push_back(process);
    }

    /// Insert after every queued process of smaller or equal size, keeping
    /// ascending order with ties in arrival order.
    pub fn insert_ordered(&mut self, process: Process) {
        let procs = self.procs_mut();
        let at = procs.partition_point(|queued| queued.size <= process.size);
        procs.insert(at, process);
    }

    /// Admission according to the queue's kind.
    pub fn admit(&mut self, process: Process) {
        match self.kind() {
            QueueKind::Fifo => self.enqueue(process),
            QueueKind::Ordered => self.insert_ordered(process),
        }
    }

    /// Take the front process. `None` when the queue is empty.
    pub fn dequeue(&mut self) -> Option<Process> {
        self.procs_mut().pop_front()
    }

    pub fn front(&self) -> Option<&Process> {
        self.procs().front()
    }

    pub fn back(&self) -> Option<&Process> {
        self.procs().back()
    }

    pub fn len(&self) -> usize {
        self.procs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs().is_empty()
    }

    pub fn contains(&self, id: ProcessId) -> bool {
        self.procs().iter().any(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.procs().iter()
    }

    /// Front-to-back copy of the queue contents.
    pub fn snapshot(&self) -> Vec<Process> {
        self.procs().iter().copied().collect()
    }

    /// Release every queued process. Safe to call on an empty queue.
    pub fn destroy_all(&mut self) -> Vec<Process> {
        self.procs_mut().drain(..).collect()
    }
}

#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub queues: SlotMap<QueueId, RunQueue>,
    pub proc_to_queue: FxHashMap<ProcessId, QueueId>,

    // Incremented only when a process is actually created
    next_pid: ProcessId,
}

impl Default for SimCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl SimCtx {
    pub fn new() -> Self {
        Self {
            now: 0,
            queues: SlotMap::with_capacity_and_key(3),
            proc_to_queue: FxHashMap::default(),
            next_pid: 1,
        }
    }

    pub fn peek_pid(&self) -> ProcessId {
        self.next_pid
    }

    pub fn claim_pid(&mut self) -> ProcessId {
        let id = self.next_pid;
        self.next_pid += 1;
        id
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn create_queue_fifo(&mut self) -> QueueId {
        self.queues.insert(RunQueue::new_fifo())
    }

    pub fn create_queue_ordered(&mut self) -> QueueId {
        self.queues.insert(RunQueue::new_ordered())
    }

    fn queue_insert(&mut self, queue_id: QueueId, process: Process, ordered: bool) {
        assert!(
            !self.proc_to_queue.contains_key(&process.id),
            "Process {} already present in some queue",
            process.id
        );

        let queue = self.queues.get_mut(queue_id).expect("Unknown run queue");
        if ordered {
            queue.insert_ordered(process);
        } else {
            queue.enqueue(process);
        }

        self.proc_to_queue.insert(process.id, queue_id);
    }

    pub fn queue_push_back(&mut self, queue_id: QueueId, process: Process) {
        self.queue_insert(queue_id, process, false);
    }

    pub fn queue_insert_ordered(&mut self, queue_id: QueueId, process: Process) {
        self.queue_insert(queue_id, process, true);
    }

    pub fn queue_pop_front(&mut self, queue_id: QueueId) -> Option<Process> {
        let process = self.queues.get_mut(queue_id)?.dequeue()?;

        let removed = self.proc_to_queue.remove(&process.id);
        debug_assert!(
            removed.is_some(),
            "Process {} missing queue membership",
            process.id
        );

        Some(process)
    }

    pub fn queue_snapshot(&self, queue_id: QueueId) -> Vec<Process> {
        self.queues
            .get(queue_id)
            .map(RunQueue::snapshot)
            .unwrap_or_default()
    }

    pub fn queue_len(&self, queue_id: QueueId) -> usize {
        self.queues.get(queue_id).map_or(0, RunQueue::len)
    }

    /// Drop every process held by `queue_id`. Returns how many were released.
    pub fn queue_destroy_all(&mut self, queue_id: QueueId) -> usize {
        let Some(queue) = self.queues.get_mut(queue_id) else {
            return 0;
        };
        let released = queue.destroy_all();
        for process in &released {
            self.proc_to_queue.remove(&process.id);
        }
        released.len()
    }

    pub fn process_in_any_queue(&self, id: ProcessId) -> bool {
        self.proc_to_queue.contains_key(&id)
    }
}
