/// A unit of work submitted to the pool. Opaque to the pool: no identity,
/// no return value, never inspected.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Lifecycle state of the pool.
///
/// Transitions are monotonic along `Running -> {Shutdown, Stop} -> Terminated`
/// and never move backward. Stored as a single-writer, many-reader atomic;
/// see [`ThreadPoolInner::state`](crate::pool::ThreadPoolInner::state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum PoolState {
    /// Accepting and executing tasks.
    Running = 0,
    /// Graceful shutdown: no new tasks, queued tasks still drain.
    Shutdown = 1,
    /// Immediate shutdown: no new tasks, remaining queue drained away.
    Stop = 2,
    /// All workers have exited.
    Terminated = 3,
}

impl PoolState {
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => PoolState::Running,
            1 => PoolState::Shutdown,
            2 => PoolState::Stop,
            3 => PoolState::Terminated,
            _ => unreachable!("invalid pool state {raw}"),
        }
    }
}

/// What `submit` does when the queue is at capacity. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RejectionPolicy {
    /// Park the submitting thread until space frees or the queue closes.
    #[default]
    Block,
    /// Fail the submission with [`RejectedExecution::QueueFull`](crate::errors::RejectedExecution::QueueFull).
    Abort,
    /// Silently drop the new task and report success.
    Discard,
    /// Evict the oldest queued task, then enqueue the new one.
    DiscardOldest,
    /// Run the new task synchronously on the submitting thread.
    CallerRuns,
}

/// Point-in-time snapshot of pool activity.
#[derive(Debug, Clone)]
pub struct PoolMetrics {
    pub pool_size: usize,
    pub queued_tasks: usize,
    pub remaining_capacity: usize,
    pub total_submitted: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
}

impl PoolMetrics {
    pub fn is_full(&self) -> bool {
        self.remaining_capacity == 0
    }

    pub fn queue_pressure(&self) -> f64 {
        let capacity = self.queued_tasks + self.remaining_capacity;
        if capacity == 0 {
            return 0.0;
        }
        self.queued_tasks as f64 / capacity as f64
    }

    pub fn success_rate(&self) -> f64 {
        let finished = self.completed_tasks + self.failed_tasks;
        if finished == 0 {
            return 1.0;
        }
        self.completed_tasks as f64 / finished as f64
    }
}
