//! Fixed-size thread pool fronted by a capacity-bounded FIFO task queue
//!
//! # Features
//! - Bounded queue with blocking put/take, non-blocking offer and atomic drain
//! - Five backpressure policies: block, abort, discard, discard-oldest, caller-runs
//! - Graceful and immediate shutdown with a monotonic lifecycle state machine
//! - Task panics contained per worker and reported through an injected handler
//! - Point-in-time metrics and lifecycle predicates
//! - Presets for CPU-bound and I/O-bound workloads

pub mod errors;
pub mod model;
pub mod pool;
pub mod queue;

mod worker;

pub use errors::RejectedExecution;
pub use model::{PoolMetrics, PoolState, RejectionPolicy, Task};
pub use pool::{Config, PanicHandler, ThreadPool, ThreadPoolInner};
pub use queue::BoundedQueue;
