//! Undirected edges, path state and stroke toggling.
//!
//! An edge between two adjacent cells is identified by an [`EdgeKey`] whose
//! text form sorts the two cell keys and joins them with a comma, so an edge
//! has the same key whichever way it is traversed. A stroke walks a resolved
//! direction from a start cell and flips every edge it crosses; walking the
//! same stroke again flips them back.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::resolve::Resolution;
use crate::board::hex::{Cell, KeyError};

/// Canonical identifier of an undirected edge between two cells.
///
/// `first` is always the cell whose key sorts lexicographically first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EdgeKey {
    first: Cell,
    second: Cell,
}

impl EdgeKey {
    /// The key for the edge joining `a` and `b`, in either order.
    pub fn between(a: Cell, b: Cell) -> EdgeKey {
        if a.key() <= b.key() {
            EdgeKey { first: a, second: b }
        } else {
            EdgeKey { first: b, second: a }
        }
    }

    /// Both endpoints, in key order.
    pub const fn cells(&self) -> (Cell, Cell) {
        (self.first, self.second)
    }

    /// Parses `"a,b"`; the endpoints are re-sorted, so any order is accepted.
    pub fn parse(s: &str) -> Result<EdgeKey, KeyError> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| KeyError::MissingEdgeSeparator(s.to_string()))?;
        Ok(EdgeKey::between(Cell::parse_key(a)?, Cell::parse_key(b)?))
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.first, self.second)
    }
}

impl FromStr for EdgeKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeKey::parse(s)
    }
}

impl From<EdgeKey> for String {
    fn from(edge: EdgeKey) -> String {
        edge.to_string()
    }
}

impl TryFrom<String> for EdgeKey {
    type Error = KeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        EdgeKey::parse(&s)
    }
}

/// On/off state of path edges.
///
/// An edge mapped to `false` is equivalent to an absent edge; turning an edge
/// off keeps the entry so a later merge can override an earlier `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathState {
    edges: BTreeMap<EdgeKey, bool>,
}

impl PathState {
    /// An empty path state.
    pub fn new() -> Self {
        PathState::default()
    }

    pub fn is_on(&self, edge: &EdgeKey) -> bool {
        self.edges.get(edge).copied().unwrap_or(false)
    }

    /// Records `edge` as on or off. Off entries are kept, see [`PathState`].
    pub fn set(&mut self, edge: EdgeKey, on: bool) {
        self.edges.insert(edge, on);
    }

    /// Returns a copy of `self` with every entry of `toggles` written over it.
    pub fn merged(&self, toggles: &PathState) -> PathState {
        let mut out = self.clone();
        out.edges
            .extend(toggles.edges.iter().map(|(k, v)| (*k, *v)));
        out
    }

    /// Edges currently switched on.
    pub fn on_edges(&self) -> impl Iterator<Item = &EdgeKey> + '_ {
        self.edges.iter().filter(|(_, &on)| on).map(|(k, _)| k)
    }

    /// Number of edges switched on.
    pub fn count_on(&self) -> usize {
        self.on_edges().count()
    }

    /// All stored entries, including edges switched off.
    pub fn entries(&self) -> impl Iterator<Item = (&EdgeKey, bool)> + '_ {
        self.edges.iter().map(|(k, &v)| (k, v))
    }

    /// Number of stored entries, including edges switched off.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// True if both states switch on exactly the same edges.
    pub fn same_edges_on(&self, other: &PathState) -> bool {
        self.on_edges().eq(other.on_edges())
    }
}

impl FromIterator<(EdgeKey, bool)> for PathState {
    fn from_iter<I: IntoIterator<Item = (EdgeKey, bool)>>(iter: I) -> Self {
        PathState {
            edges: iter.into_iter().collect(),
        }
    }
}

/// The cells visited by a walk of `resolution.length` unit steps from
/// `start`, including `start` itself.
pub fn walk_cells(start: Cell, resolution: Resolution) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(resolution.length as usize + 1);
    let mut cur = start;
    cells.push(cur);
    for _ in 0..resolution.length {
        cur = cur.step(resolution.direction);
        cells.push(cur);
    }
    cells
}

/// The edges crossed by a walk, in walk order. No bounds checks: edges that
/// leave the board are still valid keys.
pub fn walk_edges(start: Cell, resolution: Resolution) -> Vec<EdgeKey> {
    walk_cells(start, resolution)
        .windows(2)
        .map(|w| EdgeKey::between(w[0], w[1]))
        .collect()
}

/// Computes the toggle set of a stroke: every crossed edge mapped to the
/// negation of its state in `reference`.
///
/// Merging the result into `reference` applies the stroke; applying the same
/// stroke to that result restores `reference`'s on/off pattern.
pub fn toggle_walk(start: Cell, resolution: Resolution, reference: &PathState) -> PathState {
    walk_edges(start, resolution)
        .into_iter()
        .map(|edge| {
            let on = !reference.is_on(&edge);
            (edge, on)
        })
        .collect()
}
