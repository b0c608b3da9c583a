use crate::global_variables::QUADRANT_COUNT;
use crate::simulation_engine::directions::Direction;
use std::fmt;

/// One of the four cells of the intersection.
///
/// Stored 0-based so it can index the lock set directly; displayed 1-based
/// to match the usual quadrant numbering of the road rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quadrant(u8);

impl Quadrant {
    pub const ALL: [Quadrant; QUADRANT_COUNT] = [Quadrant(0), Quadrant(1), Quadrant(2), Quadrant(3)];

    /// Builds a quadrant from its 1-based number. Panics outside `1..=4`.
    pub const fn numbered(number: u8) -> Self {
        assert!(number >= 1 && number as usize <= QUADRANT_COUNT);
        Quadrant(number - 1)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn number(self) -> u8 {
        self.0 + 1
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

/// The quadrants a car holds while crossing, in ascending order.
///
/// Never empty, never more than three cells, never a repeated cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Path {
    cells: [Quadrant; 3],
    len: usize,
}

impl Path {
    fn of(numbers: &[u8]) -> Self {
        debug_assert!(!numbers.is_empty() && numbers.len() <= 3);
        debug_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        let mut cells = [Quadrant(0); 3];
        for (slot, &n) in cells.iter_mut().zip(numbers) {
            *slot = Quadrant::numbered(n);
        }
        Self {
            cells,
            len: numbers.len(),
        }
    }

    pub fn as_slice(&self) -> &[Quadrant] {
        &self.cells[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = Quadrant> + '_ {
        self.as_slice().iter().copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, quadrant: Quadrant) -> bool {
        self.as_slice().contains(&quadrant)
    }

    /// True when two paths share at least one quadrant and so cannot cross together.
    pub fn conflicts_with(&self, other: &Path) -> bool {
        self.iter().any(|q| other.contains(q))
    }

    /// 1-based quadrant numbers, e.g. `[2, 3, 4]`.
    pub fn numbers(&self) -> Vec<u8> {
        self.iter().map(Quadrant::number).collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|q| q.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Quadrants a car entering from `entry` and leaving towards `exit` must hold,
/// following right-hand traffic rules. U-turns (`entry == exit`) included.
pub fn compute_path(entry: Direction, exit: Direction) -> Path {
    use Direction::*;

    let numbers: &[u8] = match (entry, exit) {
        (North, North) => &[1, 2],
        (North, South) => &[2, 3],
        (North, East) => &[2, 3, 4],
        (North, West) => &[2],

        (South, North) => &[1, 4],
        (South, South) => &[3, 4],
        (South, East) => &[4],
        (South, West) => &[1, 2, 4],

        (East, North) => &[1],
        (East, South) => &[1, 2, 3],
        (East, East) => &[1, 4],
        (East, West) => &[1, 2],

        (West, North) => &[1, 3, 4],
        (West, South) => &[3],
        (West, East) => &[3, 4],
        (West, West) => &[2, 3],
    };
    Path::of(numbers)
}
