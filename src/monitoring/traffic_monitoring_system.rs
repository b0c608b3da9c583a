use crate::global_variables::LANE_COUNT;
use crate::shared_data::CrossingEvent;
use crate::simulation_engine::directions::Direction;
use std::error::Error;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// Appends crossing events to a CSV file, writing the header only when the
/// file is missing or empty. An empty `events` slice leaves the file untouched.
pub fn log_crossings_to_csv(
    path: impl AsRef<Path>,
    events: &[CrossingEvent],
) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    if events.is_empty() {
        return Ok(());
    }
    let has_content = fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!has_content)
        .from_writer(file);
    for event in events {
        wtr.serialize(event)?;
    }
    wtr.flush()?;
    log::info!("Logged {} crossings to {}", events.len(), path.display());
    Ok(())
}

/// Reads back a file written by [`log_crossings_to_csv`].
pub fn read_crossings_from_csv(path: impl AsRef<Path>) -> Result<Vec<CrossingEvent>, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut events = Vec::new();
    for result in rdr.deserialize() {
        let event: CrossingEvent = result?;
        events.push(event);
    }
    Ok(events)
}

/// Crossing counts per entry lane and per exit direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaneSummary {
    pub by_entry: [usize; LANE_COUNT],
    pub by_exit: [usize; LANE_COUNT],
    pub u_turns: usize,
}

impl LaneSummary {
    pub fn from_events(events: &[CrossingEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            summary.by_entry[event.entry.index()] += 1;
            summary.by_exit[event.exit.index()] += 1;
            if event.entry == event.exit {
                summary.u_turns += 1;
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.by_entry.iter().sum()
    }

    pub fn log(&self) {
        for dir in Direction::ALL {
            log::info!(
                "Lane {:<5}  in: {:>4}  out: {:>4}",
                dir.name(),
                self.by_entry[dir.index()],
                self.by_exit[dir.index()]
            );
        }
        log::info!("U-turns: {}", self.u_turns);
    }
}
