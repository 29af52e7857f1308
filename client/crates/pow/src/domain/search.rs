//! Nonce search
//!
//! Scans counters `0, 1, 2, ...` for the first one whose digest meets the
//! difficulty. The parallel variant partitions the counter space by stride
//! and returns the same (smallest) counter as the sequential scan.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Instant;

use crate::domain::services::{PrefixHasher, meets_difficulty};
use crate::domain::value_objects::{Difficulty, Nonce};

/// Counters hashed between two stop-flag checks
pub const DEFAULT_BATCH: u64 = 4096;

/// Shared attempt counter, readable while a search runs
#[derive(Debug, Clone, Default)]
pub struct SearchProgress(Arc<AtomicU64>);

impl SearchProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn add(&self, n: u64) {
        if n > 0 {
            self.0.fetch_add(n, Ordering::Relaxed);
        }
    }
}

/// Cancellation and reporting handle for a running search
///
/// Clones share the same stop flag and progress counter, so one clone can be
/// kept by the caller while another drives the search.
#[derive(Debug, Clone)]
pub struct SearchControl {
    stop: Arc<AtomicBool>,
    deadline: Option<Instant>,
    progress: SearchProgress,
    batch: u64,
}

impl Default for SearchControl {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchControl {
    pub fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            deadline: None,
            progress: SearchProgress::new(),
            batch: DEFAULT_BATCH,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_progress(mut self, progress: SearchProgress) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_batch(mut self, batch: u64) -> Self {
        self.batch = batch.max(1);
        self
    }

    /// Request the search to stop at its next check
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn progress(&self) -> &SearchProgress {
        &self.progress
    }

    fn should_halt(&self) -> bool {
        self.is_stopped() || self.deadline_passed()
    }
}

/// Find the smallest counter meeting the difficulty
///
/// Unbounded: at high difficulty this may run for a very long time. Use
/// [`solve_with`] or [`solve_parallel`] when the search must be stoppable.
pub fn solve(challenge: &str, identity: &str, difficulty: Difficulty) -> Nonce {
    let hasher = PrefixHasher::new(challenge, identity);
    let mut counter = 0u64;
    loop {
        if meets_difficulty(&hasher.digest(counter), difficulty) {
            return Nonce::new(counter);
        }
        counter = counter.wrapping_add(1);
    }
}

/// Sequential search honoring the stop flag and deadline
///
/// Returns `None` if stopped before a solution was found.
pub fn solve_with(
    challenge: &str,
    identity: &str,
    difficulty: Difficulty,
    control: &SearchControl,
) -> Option<Nonce> {
    let hasher = PrefixHasher::new(challenge, identity);
    let mut pending = 0u64;
    let mut counter = 0u64;
    loop {
        if meets_difficulty(&hasher.digest(counter), difficulty) {
            control.progress.add(pending + 1);
            return Some(Nonce::new(counter));
        }
        pending += 1;
        if pending == control.batch {
            control.progress.add(pending);
            pending = 0;
            if control.should_halt() {
                return None;
            }
        }
        counter = counter.checked_add(1)?;
    }
}

/// Multi-threaded search over `threads` interleaved counter sequences
///
/// Worker `w` tries `w, w + threads, w + 2*threads, ...`. A shared minimum
/// lets every worker stop once its next counter exceeds the best solution
/// seen so far, so without cancellation the result equals [`solve`].
pub fn solve_parallel(
    challenge: &str,
    identity: &str,
    difficulty: Difficulty,
    threads: usize,
    control: &SearchControl,
) -> Option<Nonce> {
    if threads <= 1 {
        return solve_with(challenge, identity, difficulty, control);
    }

    let hasher = PrefixHasher::new(challenge, identity);
    let best = AtomicU64::new(u64::MAX);
    let step = threads as u64;

    thread::scope(|scope| {
        for worker in 0..step {
            let hasher = &hasher;
            let best = &best;
            scope.spawn(move || {
                let mut counter = worker;
                let mut pending = 0u64;
                while counter < best.load(Ordering::Acquire) {
                    if meets_difficulty(&hasher.digest(counter), difficulty) {
                        best.fetch_min(counter, Ordering::AcqRel);
                        pending += 1;
                        break;
                    }
                    pending += 1;
                    if pending == control.batch {
                        control.progress.add(pending);
                        pending = 0;
                        if control.should_halt() {
                            break;
                        }
                    }
                    counter = match counter.checked_add(step) {
                        Some(next) => next,
                        None => break,
                    };
                }
                control.progress.add(pending);
            });
        }
    });

    let found = best.into_inner();
    (found != u64::MAX).then(|| Nonce::new(found))
}
