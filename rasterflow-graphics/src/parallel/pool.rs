//! Internal worker threads behind [`WorkerPool`](super::WorkerPool).
//!
//! Workers spin briefly before blocking on a condvar, which keeps wakeup
//! latency low for the bursty phase-at-a-time dispatch the frame driver
//! produces.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// Spin iterations before a worker parks on the condvar.
const SPIN_COUNT: u32 = 1000;

/// Shared job queue with a condition variable for wake/sleep.
pub(crate) struct WorkQueue {
    jobs: Mutex<VecDeque<Job>>,
    available: Condvar,
    pending: AtomicUsize,
    shutdown: AtomicBool,
}

impl WorkQueue {
    pub(crate) fn new() -> Self {
        Self {
            jobs: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            pending: AtomicUsize::new(0),
            shutdown: AtomicBool::new(false),
        }
    }

    pub(crate) fn push(&self, job: Job) {
        {
            let mut queue = self.jobs.lock().unwrap();
            queue.push_back(job);
        }
        self.pending.fetch_add(1, Ordering::Release);
        self.available.notify_one();
    }

    fn try_pop(&self) -> Option<Job> {
        // Fast path: no lock while the queue is empty.
        if self.pending.load(Ordering::Acquire) == 0 {
            return None;
        }

        let mut queue = self.jobs.lock().unwrap();
        queue.pop_front().map(|job| {
            self.pending.fetch_sub(1, Ordering::Release);
            job
        })
    }

    fn pop_blocking(&self) -> Option<Job> {
        let mut queue = self.jobs.lock().unwrap();
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                return None;
            }
            if let Some(job) = queue.pop_front() {
                self.pending.fetch_sub(1, Ordering::Release);
                return Some(job);
            }
            queue = self.available.wait(queue).unwrap();
        }
    }

    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
        self.available.notify_all();
    }
}

/// Spawn one worker thread draining `queue` until shutdown.
pub(crate) fn spawn_worker(queue: Arc<WorkQueue>, index: usize) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("rasterflow-worker-{index}"))
        .spawn(move || {
            log::debug!("render worker {index} up");
            worker_loop(&queue);
            log::debug!("render worker {index} down");
        })
        .expect("failed to spawn render worker")
}

fn worker_loop(queue: &WorkQueue) {
    loop {
        // Phase 1: spin; try_pop is just an atomic check most of the time.
        for _ in 0..SPIN_COUNT {
            if let Some(job) = queue.try_pop() {
                job();
                continue;
            }
            if queue.shutdown.load(Ordering::Acquire) {
                return;
            }
            std::hint::spin_loop();
        }

        // Phase 2: nothing after spinning, park on the condvar.
        match queue.pop_blocking() {
            Some(job) => job(),
            None => return,
        }
    }
}
