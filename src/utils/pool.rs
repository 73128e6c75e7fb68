//! Bounded parallel execution.
//!
//! [`Semaphore`] is a counting semaphore with scoped permits. [`WorkerPool`]
//! pairs one with a rayon thread pool of the same width and runs one task per
//! unit of work, so every concurrent stage of the engine shares the same
//! acquire / spawn / release discipline.

use std::fmt::Debug;

use parking_lot::{Condvar, Mutex};

use crate::error::Result;

/// Counting semaphore
///
/// `acquire` blocks until a permit is free. Permits are returned by dropping
/// the [`SemaphorePermit`] guard, so a task that panics still releases its slot.
/// No fairness is guaranteed among waiters.
pub struct Semaphore {
    capacity: usize,
    available: Mutex<usize>,
    released: Condvar,
}

impl Semaphore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            available: Mutex::new(capacity),
            released: Condvar::new(),
        }
    }

    /// Block the calling thread until a permit is free and take it
    pub fn acquire(&self) -> SemaphorePermit<'_> {
        let mut available = self.available.lock();
        while *available == 0 {
            self.released.wait(&mut available);
        }
        *available -= 1;
        SemaphorePermit { semaphore: self }
    }

    /// Take a permit only if one is free right now
    pub fn try_acquire(&self) -> Option<SemaphorePermit<'_>> {
        let mut available = self.available.lock();
        if *available == 0 {
            return None;
        }
        *available -= 1;
        Some(SemaphorePermit { semaphore: self })
    }

    /// Number of permits not currently held
    pub fn available(&self) -> usize {
        *self.available.lock()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn release(&self) {
        let mut available = self.available.lock();
        debug_assert!(*available < self.capacity, "permit released twice");
        *available += 1;
        drop(available);
        self.released.notify_one();
    }
}

impl Debug for Semaphore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Semaphore")
            .field("capacity", &self.capacity)
            .field("available", &self.available())
            .finish()
    }
}

/// A held slot of a [`Semaphore`], released on drop
#[must_use = "the permit is released as soon as it is dropped"]
pub struct SemaphorePermit<'a> {
    semaphore: &'a Semaphore,
}

impl Drop for SemaphorePermit<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}

/// Fixed-width pool running one task per unit of work
pub struct WorkerPool {
    limiter: Semaphore,
    threads: rayon::ThreadPool,
}

impl WorkerPool {
    /// Build a pool that runs at most `width` tasks at once
    pub fn new(width: usize) -> Result<Self> {
        let threads = rayon::ThreadPoolBuilder::new()
            .num_threads(width)
            .thread_name(|i| format!("tfidf-worker-{i}"))
            .build()?;
        Ok(Self {
            limiter: Semaphore::new(width),
            threads,
        })
    }

    pub fn width(&self) -> usize {
        self.limiter.capacity()
    }

    pub fn limiter(&self) -> &Semaphore {
        &self.limiter
    }

    /// Run `task` once per item and collect the outputs.
    ///
    /// The calling thread takes a permit before spawning each task, so it
    /// stalls while `width` tasks are in flight. Every output goes through a
    /// channel sized to the number of items, so no task ever waits on the sink.
    /// Returns after all tasks have finished. Output order is unspecified.
    pub fn map<I, T, F>(&self, items: I, task: F) -> Vec<T>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: Send,
        T: Send,
        F: Fn(I::Item) -> T + Sync,
    {
        let items = items.into_iter();
        let task_num = items.len();
        let (sink, drain) = crossbeam_channel::bounded(task_num);
        let task = &task;

        self.threads.in_place_scope(|scope| {
            for item in items {
                let permit = self.limiter.acquire();
                let sink = sink.clone();
                scope.spawn(move |_| {
                    let _permit = permit;
                    // capacity equals the task count, the receiver outlives the scope
                    let _ = sink.send(task(item));
                });
            }
        });
        drop(sink);

        let mut outputs = Vec::with_capacity(task_num);
        outputs.extend(drain.try_iter());
        outputs
    }
}

impl Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("width", &self.width())
            .finish()
    }
}
