use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// Returned by blocking insertions when the queue was closed, either before
/// the call or while the caller was parked waiting for space.
#[derive(Debug, PartialEq, Eq)]
pub struct Closed;

/// Why a non-blocking [`BoundedQueue::offer`] did not insert.
#[derive(Debug)]
pub enum OfferError<T> {
    /// Queue at capacity; the rejected item is handed back so the caller's
    /// backpressure policy can decide what to do with it.
    Full(T),
    /// Queue closed; nothing is admitted anymore.
    Closed,
}

/// Fixed-capacity FIFO with blocking put/take, a closeable state and an
/// atomic drain.
///
/// One mutex guards the buffer and the `closed` flag; two condvars carry the
/// "not full" and "not empty" wait conditions. `closed` is monotonic: once
/// set it never clears, and setting it wakes every parked waiter.
pub struct BoundedQueue<T> {
    inner: Mutex<Inner<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

struct Inner<T> {
    buf: VecDeque<T>,
    closed: bool,
}

impl<T> BoundedQueue<T> {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "queue capacity must be at least 1");
        Self {
            inner: Mutex::new(Inner {
                buf: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    /// Insert at the tail, parking the calling thread until space frees up.
    ///
    /// Fails with [`Closed`] if the queue is already closed or closes while
    /// the caller is waiting. Holds no lock other than the queue's own mutex,
    /// and releases that while parked.
    pub fn put(&self, item: T) -> Result<(), Closed> {
        let mut inner = self.inner.lock();
        while inner.buf.len() == self.capacity && !inner.closed {
            self.not_full.wait(&mut inner);
        }
        if inner.closed {
            return Err(Closed);
        }
        inner.buf.push_back(item);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Non-blocking insert at the tail.
    pub fn offer(&self, item: T) -> Result<(), OfferError<T>> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(OfferError::Closed);
        }
        if inner.buf.len() == self.capacity {
            return Err(OfferError::Full(item));
        }
        inner.buf.push_back(item);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Non-blocking insert that always succeeds on an open queue: when full,
    /// the head (oldest) element is removed and dropped unconditionally
    /// before the new item goes in at the tail.
    pub fn offer_displacing_oldest(&self, item: T) -> Result<(), Closed> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(Closed);
        }
        if inner.buf.len() == self.capacity {
            inner.buf.pop_front();
        }
        inner.buf.push_back(item);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove and return the head, parking the calling thread until an
    /// element arrives. Returns `None` once the queue is closed and empty --
    /// the consumer's termination signal.
    pub fn take(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        loop {
            if let Some(item) = inner.buf.pop_front() {
                self.not_full.notify_one();
                return Some(item);
            }
            if inner.closed {
                return None;
            }
            self.not_empty.wait(&mut inner);
        }
    }

    /// Atomically remove and return everything currently queued, in FIFO
    /// order. Non-blocking.
    pub fn drain(&self) -> Vec<T> {
        let mut inner = self.inner.lock();
        let drained: Vec<T> = inner.buf.drain(..).collect();
        if !drained.is_empty() {
            self.not_full.notify_all();
        }
        drained
    }

    /// Close the queue and wake every parked `put` and `take` waiter.
    /// Idempotent; `closed` never clears again.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().buf.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.lock().buf.len() == self.capacity
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.inner.lock().buf.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}
