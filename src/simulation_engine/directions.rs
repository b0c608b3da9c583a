use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compass direction, used both to name an entry lane and an exit.
///
/// The numeric codes (`NORTH = 0` .. `WEST = 3`) are the ones used in schedule
/// files and in the textual crossing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All four directions, in lane-index order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Index of the lane entering from this direction.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Numeric code used by schedule files and crossing output.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::South => "SOUTH",
            Direction::East => "EAST",
            Direction::West => "WEST",
        }
    }
}

/// Rejected direction code or name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction `{0}` (expected 0-3 or NORTH/SOUTH/EAST/WEST)")]
pub struct InvalidDirection(pub String);

impl TryFrom<u8> for Direction {
    type Error = InvalidDirection;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| InvalidDirection(code.to_string()))
    }
}

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u8>() {
            return Direction::try_from(code);
        }
        match s.to_ascii_uppercase().as_str() {
            "NORTH" | "N" => Ok(Direction::North),
            "SOUTH" | "S" => Ok(Direction::South),
            "EAST" | "E" => Ok(Direction::East),
            "WEST" | "W" => Ok(Direction::West),
            _ => Err(InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_lane_order() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
            assert_eq!(Direction::try_from(i as u8), Ok(*dir));
        }
        assert!(Direction::try_from(4).is_err());
    }

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("2".parse::<Direction>(), Ok(Direction::East));
        assert_eq!("west".parse::<Direction>(), Ok(Direction::West));
        assert_eq!("N".parse::<Direction>(), Ok(Direction::North));
        assert!("up".parse::<Direction>().is_err());
        assert!("-1".parse::<Direction>().is_err());
    }
}
