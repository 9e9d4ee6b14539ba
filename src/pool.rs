use super::{
    errors::RejectedExecution,
    model::{PoolMetrics, PoolState, RejectionPolicy, Task},
    queue::{BoundedQueue, OfferError},
    worker::Worker,
};
use parking_lot::{Condvar, Mutex};
use std::{
    any::Any,
    sync::{
        atomic::{AtomicU8, AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

/// Pool configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub num_threads: usize,
    pub queue_capacity: usize,
    pub rejection_policy: RejectionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let num_cpus = num_cpus::get();
        Self {
            num_threads: num_cpus * 2,
            queue_capacity: num_cpus * 20,
            rejection_policy: RejectionPolicy::Block,
        }
    }
}

impl Config {
    /// Fixed-size pool with the default blocking backpressure.
    pub fn fixed(num_threads: usize, queue_capacity: usize) -> Self {
        Self {
            num_threads,
            queue_capacity,
            rejection_policy: RejectionPolicy::Block,
        }
    }

    /// Fixed-size pool that pushes overflow back onto the submitting thread.
    pub fn caller_runs(num_threads: usize) -> Self {
        Self {
            num_threads,
            queue_capacity: num_threads,
            rejection_policy: RejectionPolicy::CallerRuns,
        }
    }

    /// One worker per core, small queue.
    pub fn cpu_bound() -> Self {
        let num_cpus = num_cpus::get();
        Self {
            num_threads: num_cpus,
            queue_capacity: num_cpus * 2,
            rejection_policy: RejectionPolicy::Block,
        }
    }

    /// More workers than cores, larger queue.
    pub fn io_bound() -> Self {
        let num_cpus = num_cpus::get();
        Self {
            num_threads: num_cpus * 2,
            queue_capacity: num_cpus * 20,
            rejection_policy: RejectionPolicy::Block,
        }
    }
}

/// Called on a worker thread with the worker id and the panic payload of a
/// failed task. Failure handling is the caller's policy, not the pool's:
/// inject one at construction or get the default `tracing::error!` report.
pub type PanicHandler = Arc<dyn Fn(usize, Box<dyn Any + Send>) + Send + Sync>;

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "opaque panic payload"
    }
}

fn default_panic_handler(worker: usize, payload: Box<dyn Any + Send>) {
    tracing::error!(worker, "task panicked: {}", panic_message(payload.as_ref()));
}

/// State shared between the controller and the worker threads.
///
/// Two synchronization domains, kept apart so a blocked `put` can never
/// stall a shutdown: the queue has its own mutex, while `state` is a
/// single-writer atomic read with acquire and written with release ordering.
pub(crate) struct PoolShared {
    pub(crate) queue: BoundedQueue<Task>,
    state: AtomicU8,
    live_workers: AtomicUsize,
    termination_lock: Mutex<()>,
    terminated: Condvar,
    pub(crate) completed_tasks: AtomicUsize,
    pub(crate) failed_tasks: AtomicUsize,
    pub(crate) panic_handler: PanicHandler,
}

impl PoolShared {
    pub(crate) fn state(&self) -> PoolState {
        PoolState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Worker exit bookkeeping; the last worker out moves the pool to
    /// `Terminated` and wakes every `await_termination` waiter.
    pub(crate) fn worker_exited(&self, worker: usize) {
        tracing::trace!(worker, "worker exited");
        if self.live_workers.fetch_sub(1, Ordering::AcqRel) == 1 {
            let _guard = self.termination_lock.lock();
            self.state
                .store(PoolState::Terminated as u8, Ordering::Release);
            self.terminated.notify_all();
            tracing::debug!("pool terminated");
        }
    }
}

pub type ThreadPool = Arc<ThreadPoolInner>;

/// Fixed-size worker pool over a bounded FIFO queue.
///
/// Worker threads are spawned once at construction and never replaced. The
/// lifecycle is monotonic: `Running -> {Shutdown, Stop} -> Terminated`.
pub struct ThreadPoolInner {
    shared: Arc<PoolShared>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
    total_submitted: AtomicUsize,
    config: Config,
}

impl ThreadPoolInner {
    /// Pool with `num_threads` workers, a queue of `queue_capacity` and the
    /// default blocking policy.
    pub fn new(num_threads: usize, queue_capacity: usize) -> ThreadPool {
        Self::with_config(Config::fixed(num_threads, queue_capacity))
    }

    pub fn with_config(config: Config) -> ThreadPool {
        Self::with_config_and_handler(config, Arc::new(default_panic_handler))
    }

    /// # Panics
    ///
    /// Panics if `config.num_threads` or `config.queue_capacity` is zero.
    pub fn with_config_and_handler(config: Config, panic_handler: PanicHandler) -> ThreadPool {
        assert!(config.num_threads >= 1, "pool must have at least one worker");

        let shared = Arc::new(PoolShared {
            queue: BoundedQueue::new(config.queue_capacity),
            state: AtomicU8::new(PoolState::Running as u8),
            live_workers: AtomicUsize::new(config.num_threads),
            termination_lock: Mutex::new(()),
            terminated: Condvar::new(),
            completed_tasks: AtomicUsize::new(0),
            failed_tasks: AtomicUsize::new(0),
            panic_handler,
        });

        let handles = (0..config.num_threads)
            .map(|id| {
                let worker = Worker::new(id, shared.clone());
                thread::Builder::new()
                    .name(format!("bounded-pool-worker-{id}"))
                    .spawn(move || worker.run())
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Arc::new(ThreadPoolInner {
            shared,
            workers: Mutex::new(handles),
            total_submitted: AtomicUsize::new(0),
            config,
        })
    }

    /// Admit a task for execution.
    ///
    /// Fails with [`RejectedExecution::PoolNotRunning`] once shutdown has
    /// begun, whatever the policy. On a full queue the configured
    /// [`RejectionPolicy`] decides: block, fail, drop the new task, evict
    /// the oldest, or run inline on the calling thread.
    pub fn submit<F>(&self, task: F) -> Result<(), RejectedExecution>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_boxed(Box::new(task))
    }

    fn submit_boxed(&self, task: Task) -> Result<(), RejectedExecution> {
        if self.state() != PoolState::Running {
            return Err(RejectedExecution::PoolNotRunning);
        }

        // Fast path: an uncontended queue admits without consulting the policy.
        let task = match self.shared.queue.offer(task) {
            Ok(()) => {
                self.total_submitted.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }
            Err(OfferError::Closed) => return Err(RejectedExecution::PoolNotRunning),
            Err(OfferError::Full(task)) => task,
        };

        match self.config.rejection_policy {
            RejectionPolicy::Abort => Err(RejectedExecution::QueueFull),
            // Dropping the new task on overflow is this policy's contract.
            RejectionPolicy::Discard => Ok(()),
            RejectionPolicy::DiscardOldest => {
                match self.shared.queue.offer_displacing_oldest(task) {
                    Ok(()) => {
                        self.total_submitted.fetch_add(1, Ordering::Relaxed);
                        Ok(())
                    }
                    Err(_) => Err(RejectedExecution::PoolNotRunning),
                }
            }
            RejectionPolicy::CallerRuns => {
                // Inline on the submitting thread, outside every pool lock.
                // A panic unwinds to the caller like any of its own code.
                task();
                self.total_submitted.fetch_add(1, Ordering::Relaxed);
                self.shared.completed_tasks.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            RejectionPolicy::Block => {
                // State may have moved since the gate above; re-check before
                // parking. The put holds only the queue's own mutex, so a
                // concurrent shutdown can always close the queue and wake us.
                if self.state() != PoolState::Running {
                    return Err(RejectedExecution::PoolNotRunning);
                }
                match self.shared.queue.put(task) {
                    Ok(()) => {
                        self.total_submitted.fetch_add(1, Ordering::Relaxed);
                        Ok(())
                    }
                    Err(_) => Err(RejectedExecution::ShutDownWhileWaiting),
                }
            }
        }
    }

    /// Graceful shutdown: stop admitting, workers drain and execute every
    /// task already queued. Idempotent, non-blocking.
    pub fn shutdown(&self) {
        if self.advance_state(&[PoolState::Running], PoolState::Shutdown) {
            tracing::debug!("pool shutting down, queued tasks will still run");
            self.shared.queue.close();
        }
    }

    /// Immediate shutdown: stop admitting and hand back every queued task no
    /// worker has picked up yet. Idempotent, non-blocking.
    ///
    /// A task missing from the returned list was dequeued by a worker racing
    /// ahead of the drain and runs to completion, so every admitted task is
    /// either executed or returned, exactly once. The list can fall short of
    /// the queue length observed before the call by at most the number of
    /// tasks workers grab between the close and the drain.
    pub fn shutdown_now(&self) -> Vec<Task> {
        let _ = self.advance_state(&[PoolState::Running, PoolState::Shutdown], PoolState::Stop);
        self.shared.queue.close();
        let unexecuted = self.shared.queue.drain();
        if !unexecuted.is_empty() {
            tracing::debug!(abandoned = unexecuted.len(), "pool stopped with queued tasks");
        }
        unexecuted
    }

    /// Block the caller until the pool reaches `Terminated` or the timeout
    /// elapses; returns whether termination was observed.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = self.shared.termination_lock.lock();
        while self.state() != PoolState::Terminated {
            if self
                .shared
                .terminated
                .wait_until(&mut guard, deadline)
                .timed_out()
            {
                return self.state() == PoolState::Terminated;
            }
        }
        true
    }

    /// Monotonic CAS: succeeds only from one of the `from` states, so a
    /// transition can never move the lifecycle backward.
    fn advance_state(&self, from: &[PoolState], to: PoolState) -> bool {
        let mut current = self.shared.state.load(Ordering::Acquire);
        loop {
            if !from.iter().any(|s| *s as u8 == current) {
                return false;
            }
            match self.shared.state.compare_exchange(
                current,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    pub fn state(&self) -> PoolState {
        self.shared.state()
    }

    pub fn is_running(&self) -> bool {
        self.state() == PoolState::Running
    }

    /// True once shutdown has been initiated, gracefully or not.
    pub fn is_shutdown(&self) -> bool {
        self.state() != PoolState::Running
    }

    pub fn is_terminated(&self) -> bool {
        self.state() == PoolState::Terminated
    }

    pub fn pool_size(&self) -> usize {
        self.config.num_threads
    }

    pub fn queue_len(&self) -> usize {
        self.shared.queue.len()
    }

    pub fn remaining_queue_capacity(&self) -> usize {
        self.shared.queue.remaining_capacity()
    }

    pub fn is_queue_full(&self) -> bool {
        self.shared.queue.is_full()
    }

    pub fn queue_capacity(&self) -> usize {
        self.shared.queue.capacity()
    }

    pub fn rejection_policy(&self) -> RejectionPolicy {
        self.config.rejection_policy
    }

    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            pool_size: self.config.num_threads,
            queued_tasks: self.shared.queue.len(),
            remaining_capacity: self.shared.queue.remaining_capacity(),
            total_submitted: self.total_submitted.load(Ordering::Relaxed),
            completed_tasks: self.shared.completed_tasks.load(Ordering::Relaxed),
            failed_tasks: self.shared.failed_tasks.load(Ordering::Relaxed),
        }
    }
}

/// Dropping the pool initiates a graceful shutdown (if none was requested)
/// and joins every worker, so any exit path of the holder leaves no thread
/// behind. Queued tasks still run; call `shutdown_now` first to abandon them.
impl Drop for ThreadPoolInner {
    fn drop(&mut self) {
        self.shutdown();
        for handle in self.workers.get_mut().drain(..) {
            let _ = handle.join();
        }
    }
}
