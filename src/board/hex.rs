//! Hex lattice coordinates.
//!
//! Cells are addressed by integer offset coordinates `(x, y)`. Each cell has
//! six neighbours reached by the unit steps in [`Direction::ALL`]. For angle
//! and projection math the lattice is embedded into the plane with
//! [`to_cartesian`]; pixel placement is left to the renderer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur while parsing the textual keys of a snapshot: cell
/// keys such as `"7-10"`, edge keys such as `"9-10,9-9"` and direction indices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("cell key has no '-' separator: '{0}'")]
    MissingSeparator(String),

    #[error("invalid coordinate in cell key: '{0}'")]
    InvalidCoordinate(String),

    #[error("edge key has no ',' separator: '{0}'")]
    MissingEdgeSeparator(String),

    #[error("direction index out of range: {0}")]
    InvalidDirection(u8),
}

/// A lattice position on the board.
///
/// Cells are never stored as objects; a `Cell` is just a coordinate pair.
/// The textual key form `"{x}-{y}"` is what persisted snapshots and edge keys
/// are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Creates a cell at offset coordinates `(x, y)`.
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Returns the textual key, e.g. `"7-10"`.
    pub fn key(self) -> String {
        self.to_string()
    }

    /// Parses a key produced by [`Cell::key`]. Negative coordinates are
    /// accepted (`"-1-4"`, `"3--1"`), since walks may leave the board.
    pub fn parse_key(s: &str) -> Result<Cell, KeyError> {
        // The separator is the first '-' after a possible leading sign.
        let sep = s
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-')
            .map(|(i, _)| i)
            .ok_or_else(|| KeyError::MissingSeparator(s.to_string()))?;
        let (xs, ys) = (&s[..sep], &s[sep + 1..]);
        let x = xs
            .parse::<i32>()
            .map_err(|_| KeyError::InvalidCoordinate(s.to_string()))?;
        let y = ys
            .parse::<i32>()
            .map_err(|_| KeyError::InvalidCoordinate(s.to_string()))?;
        Ok(Cell { x, y })
    }

    /// The neighbouring cell one unit step away in `dir`.
    pub const fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.offset();
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The cell `steps` unit steps away in `dir`. Saturates at the `i32`
    /// limits instead of overflowing.
    pub const fn offset_by(self, dir: Direction, steps: i32) -> Cell {
        let (dx, dy) = dir.offset();
        Cell {
            x: self.x.saturating_add(dx.saturating_mul(steps)),
            y: self.y.saturating_add(dy.saturating_mul(steps)),
        }
    }

    /// Displacement from `self` to `other` in offset units.
    pub const fn displacement_to(self, other: Cell) -> (i32, i32) {
        (other.x - self.x, other.y - self.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.x, self.y)
    }
}

impl FromStr for Cell {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cell::parse_key(s)
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> String {
        cell.key()
    }
}

impl TryFrom<String> for Cell {
    type Error = KeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Cell::parse_key(&s)
    }
}

/// One of the six unit steps between adjacent cells.
///
/// The discriminant is the stable direction index used in persisted fence
/// allocations. Index order carries no meaning beyond identity, except that
/// direction resolution breaks ties in favour of the lower index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Direction {
    NorthWest = 0,
    NorthEast = 1,
    West = 2,
    East = 3,
    SouthWest = 4,
    SouthEast = 5,
}

/// Number of lattice directions.
pub const DIRECTION_COUNT: usize = 6;

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; DIRECTION_COUNT] = [
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// Stable index of the direction, `0..6`.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Direction> {
        Direction::ALL.get(idx).copied()
    }

    /// Unit step in offset coordinates.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::NorthWest => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::SouthWest => (-1, 1),
            Direction::SouthEast => (0, 1),
        }
    }

    /// The direction pointing back the way this one came.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::NorthWest => Direction::SouthEast,
            Direction::NorthEast => Direction::SouthWest,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::SouthWest => Direction::NorthEast,
            Direction::SouthEast => Direction::NorthWest,
        }
    }
}

impl From<Direction> for u8 {
    fn from(dir: Direction) -> u8 {
        dir as u8
    }
}

impl TryFrom<u8> for Direction {
    type Error = KeyError;

    fn try_from(idx: u8) -> Result<Self, Self::Error> {
        Direction::from_index(idx as usize).ok_or(KeyError::InvalidDirection(idx))
    }
}

/// Embeds an offset-coordinate vector into the plane as `(x + y/2, y·√3)`.
///
/// Only used to compare directions by angle and projection.
pub fn to_cartesian(x: f64, y: f64) -> (f64, f64) {
    (x + y * 0.5, y * 3f64.sqrt())
}
