use crate::global_variables::QUADRANT_COUNT;
use crate::simulation_engine::route_generation::{Path, Quadrant};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A single quadrant lock plus counters used to observe it.
#[derive(Debug, Default)]
struct QuadrantLock {
    lock: Mutex<()>,
    /// Tasks currently inside the quadrant. Must stay 0 or 1.
    holders: AtomicUsize,
    /// Highest `holders` value ever seen.
    peak_holders: AtomicUsize,
    /// Completed acquisitions.
    acquisitions: AtomicUsize,
}

/// The four quadrants of the intersection, shared by every crossing task.
///
/// Quadrants are only handed out through [`QuadrantLockSet::acquire`], which
/// takes a whole [`Path`] and locks its cells in ascending order. Since every
/// task goes through the same ordering, no cycle of waiting tasks can form.
#[derive(Debug, Default)]
pub struct QuadrantLockSet {
    quadrants: [QuadrantLock; QUADRANT_COUNT],
}

impl QuadrantLockSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until every quadrant of `path` is held by the caller.
    ///
    /// The quadrants stay held until the returned guard is dropped.
    pub fn acquire(&self, path: &Path) -> QuadrantGuard<'_> {
        let mut held = Vec::with_capacity(path.len());
        for quadrant in path.iter() {
            let slot = &self.quadrants[quadrant.index()];
            // Lock only protects `()`, a poisoned lock carries no broken state.
            let guard = slot.lock.lock().unwrap_or_else(PoisonError::into_inner);
            let now = slot.holders.fetch_add(1, Ordering::SeqCst) + 1;
            slot.peak_holders.fetch_max(now, Ordering::SeqCst);
            slot.acquisitions.fetch_add(1, Ordering::Relaxed);
            log::trace!("acquired {}", quadrant);
            held.push(HeldQuadrant {
                quadrant,
                slot,
                _guard: guard,
            });
        }
        QuadrantGuard { held }
    }

    /// Tasks currently holding `quadrant`.
    pub fn holders(&self, quadrant: Quadrant) -> usize {
        self.quadrants[quadrant.index()].holders.load(Ordering::SeqCst)
    }

    /// Largest number of simultaneous holders ever observed on `quadrant`.
    pub fn peak_holders(&self, quadrant: Quadrant) -> usize {
        self.quadrants[quadrant.index()]
            .peak_holders
            .load(Ordering::SeqCst)
    }

    /// How many times `quadrant` has been acquired.
    pub fn acquisitions(&self, quadrant: Quadrant) -> usize {
        self.quadrants[quadrant.index()]
            .acquisitions
            .load(Ordering::Relaxed)
    }
}

struct HeldQuadrant<'a> {
    quadrant: Quadrant,
    slot: &'a QuadrantLock,
    _guard: MutexGuard<'a, ()>,
}

impl Drop for HeldQuadrant<'_> {
    fn drop(&mut self) {
        // Decrement before `_guard` unlocks so the next holder never sees 2.
        self.slot.holders.fetch_sub(1, Ordering::SeqCst);
        log::trace!("released {}", self.quadrant);
    }
}

/// Quadrants held by one crossing; released in reverse order on drop.
pub struct QuadrantGuard<'a> {
    held: Vec<HeldQuadrant<'a>>,
}

impl QuadrantGuard<'_> {
    pub fn quadrants(&self) -> Vec<Quadrant> {
        self.held.iter().map(|h| h.quadrant).collect()
    }
}

impl Drop for QuadrantGuard<'_> {
    fn drop(&mut self) {
        while let Some(held) = self.held.pop() {
            drop(held);
        }
    }
}
