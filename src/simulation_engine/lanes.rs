use crate::simulation_engine::directions::Direction;
use crate::simulation_engine::schedule::Schedule;
use crate::simulation_engine::vehicles::Car;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Bounded FIFO of cars waiting at the stop line of one lane.
///
/// One arrival task pushes and one crossing task pops. `push` blocks while
/// the buffer is full and `pop` blocks while it is empty; each side wakes one
/// waiter on the other side after it moves a car.
#[derive(Debug)]
pub struct LaneBuffer {
    capacity: usize,
    cars: Mutex<VecDeque<Car>>,
    /// Signalled when a slot frees up.
    not_full: Condvar,
    /// Signalled when a car is queued.
    not_empty: Condvar,
}

impl LaneBuffer {
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "lane buffer capacity must be positive");
        Self {
            capacity,
            cars: Mutex::new(VecDeque::with_capacity(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    // A panic elsewhere cannot leave the deque half-updated.
    fn queue(&self) -> MutexGuard<'_, VecDeque<Car>> {
        self.cars.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `car` at the tail, waiting for a free slot if the lane is full.
    pub fn push(&self, car: Car) {
        let mut cars = self.queue();
        while cars.len() >= self.capacity {
            cars = self
                .not_full
                .wait(cars)
                .unwrap_or_else(PoisonError::into_inner);
        }
        cars.push_back(car);
        drop(cars);
        self.not_empty.notify_one();
    }

    /// Removes the car at the head, waiting for one to arrive if the lane is empty.
    pub fn pop(&self) -> Car {
        let mut cars = self.queue();
        let car = loop {
            if let Some(car) = cars.pop_front() {
                break car;
            }
            cars = self
                .not_empty
                .wait(cars)
                .unwrap_or_else(PoisonError::into_inner);
        };
        drop(cars);
        self.not_full.notify_one();
        car
    }

    pub fn len(&self) -> usize {
        self.queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// An entry lane: its waiting buffer plus crossing bookkeeping.
#[derive(Debug)]
pub struct Lane {
    pub direction: Direction,
    pub buffer: LaneBuffer,
    /// Cars scheduled on this lane, fixed before any task starts.
    expected: usize,
    /// Cars that have finished crossing. Never exceeds `expected`.
    crossed: AtomicUsize,
}

impl Lane {
    pub fn new(direction: Direction, capacity: usize, expected: usize) -> Self {
        Self {
            direction,
            buffer: LaneBuffer::new(capacity),
            expected,
            crossed: AtomicUsize::new(0),
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn crossed(&self) -> usize {
        self.crossed.load(Ordering::Acquire)
    }

    /// Every scheduled car has crossed.
    pub fn is_drained(&self) -> bool {
        self.crossed() == self.expected
    }

    /// Records one completed crossing.
    pub fn record_crossing(&self) {
        let before = self.crossed.fetch_add(1, Ordering::AcqRel);
        debug_assert!(
            before < self.expected,
            "lane {} crossed more cars than scheduled",
            self.direction
        );
    }
}

/// Builds the four lanes, snapshotting each lane's car count from `schedule`.
pub fn create_lanes(schedule: &Schedule, capacity: usize) -> [Lane; 4] {
    Direction::ALL.map(|dir| Lane::new(dir, capacity, schedule.lane_len(dir)))
}
