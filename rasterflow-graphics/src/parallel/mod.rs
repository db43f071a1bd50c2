//! Cooperative frame execution across a persistent worker pool.
//!
//! The rasterizer's operations are split-parallel by construction: each
//! `(split_index, num_splits)` call touches a disjoint set of tiles. The
//! [`WorkerPool`] turns that property into a frame driver — every call to
//! [`scatter`](WorkerPool::scatter) fans one operation out over all splits
//! and returns once a barrier confirms the whole phase is done, giving the
//! clear → rasterize → blit sequence its happens-before edges. Nothing
//! inside a phase blocks or yields; all waiting happens here.

mod pool;

use std::sync::{Arc, Barrier};

use crate::split::Split;
use pool::{spawn_worker, WorkQueue};

/// Type-erased pointer to a borrowed operation, so jobs stay `'static`.
/// Safety: the dispatching call keeps the referent alive until its barrier
/// trips.
struct OpPtr(*const ());
unsafe impl Send for OpPtr {}

impl OpPtr {
    /// Consume the wrapper and hand back the raw pointer.
    ///
    /// Taking `self` by value (rather than destructuring) keeps the
    /// closure's capture of this field routed through `OpPtr`'s `Send`
    /// impl instead of disjoint-capturing the inner `*const ()` directly.
    fn into_raw(self) -> *const () {
        self.0
    }
}

/// A persistent pool of render workers.
///
/// Workers live for the pool's lifetime; each [`scatter`](Self::scatter)
/// reuses them instead of spawning threads per frame.
pub struct WorkerPool {
    queue: Arc<WorkQueue>,
    workers: Vec<std::thread::JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers. A size of zero or one degrades to inline
    /// execution in [`scatter`](Self::scatter).
    pub fn new(size: usize) -> Self {
        log::debug!("starting render pool with {size} workers");
        let queue = Arc::new(WorkQueue::new());
        let workers = (0..size)
            .map(|index| spawn_worker(Arc::clone(&queue), index))
            .collect();
        Self { queue, workers }
    }

    /// Number of workers, and therefore the split count used by `scatter`.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Run one frame operation across all splits and wait for completion.
    ///
    /// `op` is invoked exactly once per split index, concurrently. The
    /// barrier at the end is the only synchronization a frame phase needs;
    /// the splits themselves write disjoint tiles. Phases are sequential:
    /// one `scatter` at a time per pool.
    pub fn scatter<F>(&self, op: F)
    where
        F: Fn(Split) + Sync,
    {
        /// Recover the concrete operation behind the erased pointer.
        ///
        /// # Safety
        /// `op` must point at a live `F`.
        unsafe fn invoke<F: Fn(Split)>(op: *const (), split: Split) {
            unsafe { (*(op as *const F))(split) }
        }

        let count = self.size() as u32;
        if count <= 1 {
            op(Split::SINGLE);
            return;
        }

        let call: unsafe fn(*const (), Split) = invoke::<F>;
        let barrier = Arc::new(Barrier::new(self.size() + 1));
        for index in 0..count {
            let op_ptr = OpPtr(&op as *const F as *const ());
            let barrier = Arc::clone(&barrier);
            self.queue.push(Box::new(move || {
                let ptr = op_ptr.into_raw();
                // Safety: `op` outlives this job; the dispatcher blocks on
                // the same barrier before returning.
                unsafe { call(ptr, Split::new(index, count)) };
                barrier.wait();
            }));
        }

        barrier.wait();
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        log::debug!("shutting down render pool");
        self.queue.shutdown();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn scatter_runs_every_split_once() {
        let pool = WorkerPool::new(4);
        let seen = [
            AtomicU32::new(0),
            AtomicU32::new(0),
            AtomicU32::new(0),
            AtomicU32::new(0),
        ];

        pool.scatter(|split| {
            assert_eq!(split.count(), 4);
            seen[split.index() as usize].fetch_add(1, Ordering::SeqCst);
        });

        for counter in &seen {
            assert_eq!(counter.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn scatter_reuses_workers_across_phases() {
        let pool = WorkerPool::new(2);
        let hits = AtomicU32::new(0);

        for _ in 0..3 {
            pool.scatter(|_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(hits.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn tiny_pool_degrades_to_inline() {
        let pool = WorkerPool::new(0);
        let hits = AtomicU32::new(0);
        // With no workers the closure runs on the caller.
        pool.scatter(|split| {
            assert_eq!(split, Split::SINGLE);
            hits.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
