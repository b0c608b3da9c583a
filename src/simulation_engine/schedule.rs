use crate::global_variables::LANE_COUNT;
use crate::simulation_engine::directions::{Direction, InvalidDirection};
use crate::simulation_engine::vehicles::{Car, CarId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("failed to read schedule {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected `<id> <entry> <exit>`, got `{text}`")]
    Malformed { line: usize, text: String },
    #[error("line {line}: {source}")]
    Direction {
        line: usize,
        #[source]
        source: InvalidDirection,
    },
    #[error("line {line}: car id {id} already scheduled")]
    DuplicateId { line: usize, id: CarId },
}

/// Cars waiting to arrive, one ordered queue per entry lane.
///
/// Cars leave a queue in the order they were added to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    lanes: [VecDeque<Car>; LANE_COUNT],
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `car` to the queue of its entry lane.
    pub fn add(&mut self, car: Car) {
        self.lanes[car.entry.index()].push_back(car);
    }

    /// Convenience for building a lane by hand: `(id, exit)` pairs in arrival order.
    pub fn with_lane(mut self, entry: Direction, cars: &[(CarId, Direction)]) -> Self {
        for &(id, exit) in cars {
            self.add(Car::new(id, entry, exit));
        }
        self
    }

    pub fn lane_len(&self, entry: Direction) -> usize {
        self.lanes[entry.index()].len()
    }

    pub fn total_cars(&self) -> usize {
        self.lanes.iter().map(VecDeque::len).sum()
    }

    pub fn lane(&self, entry: Direction) -> &VecDeque<Car> {
        &self.lanes[entry.index()]
    }

    /// Splits the schedule into its four lane queues, in lane-index order.
    pub fn into_lanes(self) -> [VecDeque<Car>; LANE_COUNT] {
        self.lanes
    }

    /// Reads a schedule file with one `<id> <entry> <exit>` record per line.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ScheduleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        text.parse()
    }

    /// `cars_per_lane` cars on every lane with uniformly random exits.
    ///
    /// Ids are unique across the whole schedule. Same seed, same schedule.
    pub fn random(cars_per_lane: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut schedule = Schedule::new();
        let mut next_id: CarId = 1;
        for entry in Direction::ALL {
            for _ in 0..cars_per_lane {
                let exit = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
                schedule.add(Car::new(next_id, entry, exit));
                next_id += 1;
            }
        }
        schedule
    }
}

impl FromStr for Schedule {
    type Err = ScheduleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut schedule = Schedule::new();
        let mut seen = HashSet::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let fields: Vec<&str> = content.split_whitespace().collect();
            let &[id, entry, exit] = fields.as_slice() else {
                return Err(ScheduleError::Malformed {
                    line,
                    text: raw.to_string(),
                });
            };
            let id: CarId = id.parse().map_err(|_| ScheduleError::Malformed {
                line,
                text: raw.to_string(),
            })?;
            let entry: Direction = entry
                .parse()
                .map_err(|source| ScheduleError::Direction { line, source })?;
            let exit: Direction = exit
                .parse()
                .map_err(|source| ScheduleError::Direction { line, source })?;

            if !seen.insert(id) {
                return Err(ScheduleError::DuplicateId { line, id });
            }
            log::debug!("car {} scheduled from {} to {}", id, entry, exit);
            schedule.add(Car::new(id, entry, exit));
        }
        Ok(schedule)
    }
}
