//! Static region classification and per-region path tallies.
//!
//! The board is split into six coloured zones around the centre cell (9, 9)
//! by three axes: the anti-diagonal `x + y = 18` and the lines `x = 9` and
//! `y = 9`. Cells that fall in none of the six zones are white.

use std::collections::BTreeMap;
use std::fmt;

use super::hex::Cell;
use crate::edit::toggle::EdgeKey;

/// Threshold for the `x + y` axis.
const SUM_AXIS: i64 = 18;
/// Threshold for both the `x` and the `y` axis.
const COORD_AXIS: i32 = 9;

/// A scoring zone of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Purple,
    Cyan,
    Green,
    Red,
    Orange,
    Yellow,
    White,
}

impl Region {
    /// All regions in classification priority order.
    pub const ALL: [Region; 7] = [
        Region::Purple,
        Region::Cyan,
        Region::Green,
        Region::Red,
        Region::Orange,
        Region::Yellow,
        Region::White,
    ];

    /// Classifies a cell. Pure; defined for any coordinate, on or off the board.
    pub fn of(cell: Cell) -> Region {
        Region::classify(cell.x, cell.y)
    }

    /// Classifies raw coordinates. The six zones are tested in priority order
    /// and the first match wins; anything left over is white.
    pub fn classify(x: i32, y: i32) -> Region {
        // Widened so keys near the i32 limits still classify.
        let s = i64::from(x) + i64::from(y);
        let (s_hi, s_lo) = (s > SUM_AXIS, s < SUM_AXIS);
        let (x_hi, x_lo) = (x > COORD_AXIS, x < COORD_AXIS);
        let (y_hi, y_lo) = (y > COORD_AXIS, y < COORD_AXIS);

        if s_lo && x_lo && !y_lo {
            Region::Purple
        } else if s_lo && !x_hi && y_lo {
            Region::Cyan
        } else if !s_hi && x_hi && y_lo {
            Region::Green
        } else if !s_lo && x_lo && y_hi {
            Region::Red
        } else if !s_lo && !x_lo && y_hi {
            Region::Orange
        } else if s_hi && x_hi && !y_hi {
            Region::Yellow
        } else {
            Region::White
        }
    }

    /// Lowercase colour name, as shown to the user.
    pub const fn label(self) -> &'static str {
        match self {
            Region::Purple => "purple",
            Region::Cyan => "cyan",
            Region::Green => "green",
            Region::Red => "red",
            Region::Orange => "orange",
            Region::Yellow => "yellow",
            Region::White => "white",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Endpoint counts of active path edges, grouped by region.
///
/// Every active edge contributes both of its endpoint cells. The reported
/// per-region tally is the raw endpoint count halved, so it may be fractional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionTally {
    endpoints: BTreeMap<Region, u32>,
}

impl RegionTally {
    /// Tallies the endpoints of the given (active) edges.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a EdgeKey>,
    {
        let mut endpoints = BTreeMap::new();
        for edge in edges {
            let (a, b) = edge.cells();
            *endpoints.entry(Region::of(a)).or_insert(0) += 1;
            *endpoints.entry(Region::of(b)).or_insert(0) += 1;
        }
        RegionTally { endpoints }
    }

    /// Raw endpoint occurrences for a region (0 when absent).
    pub fn endpoints(&self, region: Region) -> u32 {
        self.endpoints.get(&region).copied().unwrap_or(0)
    }

    /// Halved tally for a region, or `None` if no active edge touches it.
    pub fn get(&self, region: Region) -> Option<f64> {
        self.endpoints.get(&region).map(|&n| f64::from(n) / 2.0)
    }

    /// Halved tallies for every region that has at least one endpoint.
    pub fn iter(&self) -> impl Iterator<Item = (Region, f64)> + '_ {
        self.endpoints.iter().map(|(&r, &n)| (r, f64::from(n) / 2.0))
    }

    /// Product of all present halved tallies; 1 when no edge is active.
    pub fn product(&self) -> f64 {
        self.iter().map(|(_, v)| v).product()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
