use super::{model::Task, pool::PoolShared};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::{atomic::Ordering, Arc},
};

/// One long-lived execution thread: repeatedly takes from the shared queue
/// and runs the task synchronously, exiting once `take` reports the queue
/// closed and empty. Workers only ever touch the queue and the exit
/// bookkeeping, never the controller's lifecycle transitions.
pub(crate) struct Worker {
    id: usize,
    shared: Arc<PoolShared>,
}

impl Worker {
    pub(crate) fn new(id: usize, shared: Arc<PoolShared>) -> Self {
        Self { id, shared }
    }

    pub(crate) fn run(self) {
        while let Some(task) = self.shared.queue.take() {
            self.run_task(task);
        }
        self.shared.worker_exited(self.id);
    }

    /// A panicking task must not tear down the worker: the payload is caught,
    /// handed to the injected panic handler, and the loop continues.
    fn run_task(&self, task: Task) {
        match panic::catch_unwind(AssertUnwindSafe(task)) {
            Ok(()) => {
                self.shared.completed_tasks.fetch_add(1, Ordering::Relaxed);
            }
            Err(payload) => {
                self.shared.failed_tasks.fetch_add(1, Ordering::Relaxed);
                (self.shared.panic_handler)(self.id, payload);
            }
        }
    }
}
