//! Fence allocations.
//!
//! A fence is anchored at a resource cell and runs a number of unit steps in
//! one direction. Each cell holds at most one length per direction, and a
//! cell with no fences has no entry at all.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::hex::{Cell, Direction};

/// Fence lengths per direction for one anchor cell.
pub type FenceEntry = BTreeMap<Direction, u32>;

/// All fence allocations on the board, keyed by anchor cell.
///
/// Invariant: no entry is empty and no stored length is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FenceAllocation {
    cells: BTreeMap<Cell, FenceEntry>,
}

impl FenceAllocation {
    pub fn new() -> Self {
        FenceAllocation::default()
    }

    pub fn entry(&self, cell: Cell) -> Option<&FenceEntry> {
        self.cells.get(&cell)
    }

    /// Length allocated from `cell` in `dir` (0 when none).
    pub fn length(&self, cell: Cell, dir: Direction) -> u32 {
        self.cells
            .get(&cell)
            .and_then(|e| e.get(&dir))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all lengths anchored at `cell`.
    pub fn allocated(&self, cell: Cell) -> u64 {
        self.cells
            .get(&cell)
            .map(|e| e.values().map(|&l| u64::from(l)).sum())
            .unwrap_or(0)
    }

    /// Sets the length for one direction, replacing any previous length.
    /// A length of zero removes that direction instead.
    pub fn set(&mut self, cell: Cell, dir: Direction, length: u32) {
        if length == 0 {
            self.remove_direction(cell, dir);
            return;
        }
        self.cells.entry(cell).or_default().insert(dir, length);
    }

    /// Removes one direction; drops the cell entry when it becomes empty.
    /// Returns true if a fence was removed.
    pub fn remove_direction(&mut self, cell: Cell, dir: Direction) -> bool {
        let Some(entry) = self.cells.get_mut(&cell) else {
            return false;
        };
        let removed = entry.remove(&dir).is_some();
        if entry.is_empty() {
            self.cells.remove(&cell);
        }
        removed
    }

    /// Removes every fence anchored at `cell`. Returns true if any existed.
    pub fn remove_cell(&mut self, cell: Cell) -> bool {
        self.cells.remove(&cell).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, &FenceEntry)> + '_ {
        self.cells.iter().map(|(&c, e)| (c, e))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Drops zero lengths and empty entries, e.g. after loading a snapshot
    /// written by an older tool.
    pub fn normalize(&mut self) {
        for entry in self.cells.values_mut() {
            entry.retain(|_, len| *len > 0);
        }
        self.cells.retain(|_, entry| !entry.is_empty());
    }
}
