// simulation.rs
use crate::global_variables::LANE_COUNT;
use crate::shared_data::CrossingEvent;
use crate::simulation_engine::config::{ConfigError, SimulationConfig};
use crate::simulation_engine::directions::Direction;
use crate::simulation_engine::intersections::QuadrantLockSet;
use crate::simulation_engine::lanes::{create_lanes, Lane};
use crate::simulation_engine::route_generation::compute_path;
use crate::simulation_engine::schedule::Schedule;
use crate::simulation_engine::vehicles::{Car, CarId};

use crossbeam_channel::Sender;
use std::{panic, thread};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Arrival task: feeds a lane's scheduled cars into its buffer, in order.
///
/// Blocks whenever the buffer is full and returns once `source` is exhausted.
pub fn arrive(lane: &Lane, source: impl IntoIterator<Item = Car>) {
    log::info!("[Arrive {}] started", lane.direction);
    let mut arrived = 0usize;
    for car in source {
        debug_assert_eq!(car.entry, lane.direction);
        log::debug!("[Arrive {}] car {} queued", lane.direction, car.id);
        lane.buffer.push(car);
        arrived += 1;
    }
    log::info!("[Arrive {}] done, {} cars queued", lane.direction, arrived);
}

/// Crossing task: moves cars from a lane's buffer across the intersection
/// until the lane is drained.
///
/// Each car locks every quadrant of its path (ascending order) before it
/// crosses, and its event goes to `sink` while those quadrants are held.
/// Returns the lane's cars in the order they crossed.
pub fn cross(lane: &Lane, quadrants: &QuadrantLockSet, sink: &Sender<CrossingEvent>) -> Vec<Car> {
    log::info!(
        "[Cross {}] started, {} cars expected",
        lane.direction,
        lane.expected()
    );
    let mut crossed = Vec::with_capacity(lane.expected());

    while !lane.is_drained() {
        let car = lane.buffer.pop();
        let path = compute_path(car.entry, car.exit);
        {
            let _held = quadrants.acquire(&path);
            log::debug!(
                "[Cross {}] car {} to {} through {}",
                lane.direction,
                car.id,
                car.exit,
                path
            );
            if let Err(e) = sink.send(CrossingEvent::from(&car)) {
                log::warn!(
                    "[Cross {}] crossing sink disconnected, dropped event {}",
                    lane.direction,
                    e.into_inner()
                );
            }
        }
        lane.record_crossing();
        crossed.push(car);
    }

    log::info!("[Cross {}] drained after {} cars", lane.direction, crossed.len());
    crossed
}

/// Cars that crossed, grouped by the direction they left towards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutLists {
    lists: [Vec<Car>; LANE_COUNT],
}

impl OutLists {
    fn extend(&mut self, cars: Vec<Car>) {
        for car in cars {
            self.lists[car.exit.index()].push(car);
        }
    }

    pub fn exiting(&self, exit: Direction) -> &[Car] {
        &self.lists[exit.index()]
    }

    pub fn total(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}

/// Runs the four arrival/crossing pairs on their own threads and streams one
/// event per crossing into `sink`.
///
/// Every lane's car count is fixed from `schedule` before any thread starts.
/// Returns once every lane is drained. A panic in a task is a bug, not an
/// error: it is re-raised here, and a crossing task that dies leaves its
/// arrival task parked on a full buffer, so the run does not return.
pub fn run_simulation_with_sink(
    schedule: Schedule,
    config: &SimulationConfig,
    sink: Sender<CrossingEvent>,
) -> Result<OutLists, SimulationError> {
    run_on_quadrants(schedule, config, &QuadrantLockSet::new(), sink)
}

/// Same as [`run_simulation_with_sink`], crossing through a caller-owned
/// quadrant set so its counters can be inspected afterwards.
pub fn run_on_quadrants(
    schedule: Schedule,
    config: &SimulationConfig,
    quadrants: &QuadrantLockSet,
    sink: Sender<CrossingEvent>,
) -> Result<OutLists, SimulationError> {
    config.validate()?;
    log::info!(
        "Starting simulation: {} cars, lane capacity {}",
        schedule.total_cars(),
        config.lane_capacity
    );

    let lanes = create_lanes(&schedule, config.lane_capacity);
    let mut out = OutLists::default();

    thread::scope(|scope| {
        let mut crossing = Vec::with_capacity(LANE_COUNT);

        for (lane, source) in lanes.iter().zip(schedule.into_lanes()) {
            scope.spawn(move || arrive(lane, source));
            let sink = sink.clone();
            crossing.push(scope.spawn(move || cross(lane, quadrants, &sink)));
        }

        for handle in crossing {
            let cars = handle.join().unwrap_or_else(|e| panic::resume_unwind(e));
            out.extend(cars);
        }
    });

    log::info!("Simulation finished: {} cars crossed", out.total());
    Ok(out)
}

/// Result of [`run_simulation`].
#[derive(Debug, Clone, Default)]
pub struct SimulationReport {
    /// Crossing events in the order they were emitted.
    pub events: Vec<CrossingEvent>,
    pub out: OutLists,
}

impl SimulationReport {
    /// Ids of cars that entered from `entry`, in crossing order.
    pub fn lane_order(&self, entry: Direction) -> Vec<CarId> {
        self.events
            .iter()
            .filter(|e| e.entry == entry)
            .map(|e| e.car_id)
            .collect()
    }
}

/// Runs a whole schedule and collects every crossing event.
pub fn run_simulation(
    schedule: Schedule,
    config: &SimulationConfig,
) -> Result<SimulationReport, SimulationError> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let out = run_simulation_with_sink(schedule, config, tx)?;
    let events = rx.iter().collect();
    Ok(SimulationReport { events, out })
}
