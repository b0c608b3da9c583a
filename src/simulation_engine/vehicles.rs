use crate::simulation_engine::directions::Direction;
use serde::{Deserialize, Serialize};

pub type CarId = u32;

/// A car waiting to cross, or crossing, the intersection.
///
/// Cars are plain values: they move from the schedule into a lane buffer slot
/// and from there into the crossing output. Nothing keeps a second handle to
/// a car once it has been moved on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    /// Lane the car arrives on.
    pub entry: Direction,
    /// Direction the car leaves towards.
    pub exit: Direction,
}

impl Car {
    pub fn new(id: CarId, entry: Direction, exit: Direction) -> Self {
        Self { id, entry, exit }
    }
}
