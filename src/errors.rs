/// Errors surfaced to the submitting caller when a task is refused.
///
/// Rejection is always a local, synchronous return; the pool never retries
/// a refused task on the caller's behalf.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum RejectedExecution {
    /// The pool has left the `Running` state; no policy admits new tasks.
    #[error("failed to submit task: pool not running")]
    PoolNotRunning,

    /// The queue is at capacity and the pool was built with the `Abort` policy.
    #[error("failed to submit task: queue full")]
    QueueFull,

    /// A `Block` submission was parked waiting for space and the queue was
    /// closed by a concurrent shutdown before space freed up.
    #[error("failed to submit task: pool shut down while waiting")]
    ShutDownWhileWaiting,
}
