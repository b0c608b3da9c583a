// src/shared_data.rs

use crate::simulation_engine::directions::Direction;
use crate::simulation_engine::vehicles::{Car, CarId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Emitted once per car, at the moment it has crossed the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrossingEvent {
    pub entry: Direction,
    pub exit: Direction,
    pub car_id: CarId,
}

impl From<&Car> for CrossingEvent {
    fn from(car: &Car) -> Self {
        Self {
            entry: car.entry,
            exit: car.exit,
            car_id: car.id,
        }
    }
}

/// `<entry code> <exit code> <id>`, e.g. `0 1 7` for car 7 going NORTH to SOUTH.
impl fmt::Display for CrossingEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.entry.code(), self.exit.code(), self.car_id)
    }
}
