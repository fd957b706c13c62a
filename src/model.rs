//! Grid model and pointer interaction state machine.
//!
//! The model owns the fence allocations and the path state. A gesture starts
//! on a pointer-down over a playable cell, which snapshots both mappings and
//! decides the drag mode: resource cells draw fences, every other cell draws
//! path edges. Pointer moves only record the resolved direction; the live
//! mappings change when the gesture is committed, and a cancelled gesture
//! restores the snapshot. Renderers show the pending change through
//! [`GridModel::preview`].

use log::debug;

use crate::board::hex::{Cell, Direction};
use crate::board::region::RegionTally;
use crate::config::BoardConfig;
use crate::edit::fence::FenceAllocation;
use crate::edit::resolve::{resolve_between, Resolution};
use crate::edit::toggle::{toggle_walk, EdgeKey, PathState};

/// State captured when a drag starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSnapshot {
    origin: Cell,
    origin_key: String,
    fences: FenceAllocation,
    path: PathState,
    path_mode: bool,
    hover: Option<Resolution>,
}

impl DragSnapshot {
    pub fn origin(&self) -> Cell {
        self.origin
    }

    pub fn origin_key(&self) -> &str {
        &self.origin_key
    }

    /// True when the drag draws path edges rather than fences.
    pub fn path_mode(&self) -> bool {
        self.path_mode
    }

    /// Resolution of the most recent pointer move, if it found a direction.
    pub fn hover(&self) -> Option<Resolution> {
        self.hover
    }

    pub fn fences(&self) -> &FenceAllocation {
        &self.fences
    }

    pub fn path(&self) -> &PathState {
        &self.path
    }

    /// Toggle set the drag would apply for `resolution`.
    fn toggles(&self, resolution: Option<Resolution>) -> PathState {
        match resolution {
            Some(res) => toggle_walk(self.origin, res, &self.path),
            None => PathState::new(),
        }
    }

    /// Fence allocation after committing with `resolution`.
    fn fences_after(&self, resolution: Option<Resolution>) -> FenceAllocation {
        let mut fences = self.fences.clone();
        match resolution {
            Some(res) => fences.set(self.origin, res.direction, res.length),
            None => {
                fences.remove_cell(self.origin);
            }
        }
        fences
    }
}

/// What the pending drag would change if committed now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPreview {
    /// Fence allocation that a fence-mode commit would produce.
    Fences(FenceAllocation),
    /// Path state that a path-mode commit would produce, plus the edges the
    /// stroke flips.
    Path { state: PathState, toggles: PathState },
}

/// Effect of a committed gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// Path edges flipped by the stroke; empty if no direction resolved.
    Path { toggled: PathState },
    FenceSet {
        cell: Cell,
        direction: Direction,
        length: u32,
    },
    /// No direction resolved: every fence at the origin was removed.
    FenceCleared { cell: Cell },
}

/// Result of feeding a pointer event to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// No playable cell, or the event does not apply in the current state.
    Ignored,
    Started { origin: Cell, path_mode: bool },
    Moved(Option<Resolution>),
    Committed(Commit),
}

impl Transition {
    pub fn is_commit(&self) -> bool {
        matches!(self, Transition::Committed(_))
    }
}

/// The editable board state.
#[derive(Debug, Clone)]
pub struct GridModel {
    config: BoardConfig,
    fences: FenceAllocation,
    path: PathState,
    drag: Option<DragSnapshot>,
}

impl GridModel {
    /// Creates an empty model for the given board.
    pub fn new(config: BoardConfig) -> Self {
        GridModel::with_state(config, FenceAllocation::new(), PathState::new())
    }

    /// Creates a model from previously saved mappings.
    pub fn with_state(config: BoardConfig, mut fences: FenceAllocation, path: PathState) -> Self {
        fences.normalize();
        GridModel {
            config,
            fences,
            path,
            drag: None,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn fences(&self) -> &FenceAllocation {
        &self.fences
    }

    pub fn path(&self) -> &PathState {
        &self.path
    }

    pub fn drag(&self) -> Option<&DragSnapshot> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// True for the origin cell of the drag in progress.
    pub fn is_drag_origin(&self, cell: Cell) -> bool {
        self.drag.as_ref().is_some_and(|d| d.origin == cell)
    }

    /// Starts a drag at `cell`. Ignored off the board or while a drag is
    /// already in progress.
    pub fn pointer_down(&mut self, cell: Cell) -> Transition {
        if self.drag.is_some() || !self.config.contains(cell) {
            return Transition::Ignored;
        }
        let path_mode = self.config.capacity(cell).is_none();
        debug!("drag start at {} (path_mode={})", cell, path_mode);
        self.drag = Some(DragSnapshot {
            origin: cell,
            origin_key: cell.key(),
            fences: self.fences.clone(),
            path: self.path.clone(),
            path_mode,
            hover: None,
        });
        Transition::Started {
            origin: cell,
            path_mode,
        }
    }

    /// Records the direction from the drag origin to `cell`. The live
    /// mappings are left untouched.
    pub fn pointer_move(&mut self, cell: Cell) -> Transition {
        if !self.config.contains(cell) {
            return Transition::Ignored;
        }
        let Some(drag) = self.drag.as_mut() else {
            return Transition::Ignored;
        };
        drag.hover = resolve_between(drag.origin, cell);
        Transition::Moved(drag.hover)
    }

    /// Commits the drag using the direction from the origin to `cell`.
    pub fn pointer_up(&mut self, cell: Cell) -> Transition {
        if !self.config.contains(cell) {
            return Transition::Ignored;
        }
        let Some(drag) = self.drag.take() else {
            return Transition::Ignored;
        };
        let resolution = resolve_between(drag.origin, cell);

        let commit = if drag.path_mode {
            let toggled = drag.toggles(resolution);
            self.fences = drag.fences;
            self.path = drag.path.merged(&toggled);
            Commit::Path { toggled }
        } else {
            self.fences = drag.fences_after(resolution);
            self.path = drag.path;
            match resolution {
                Some(res) => Commit::FenceSet {
                    cell: drag.origin,
                    direction: res.direction,
                    length: res.length,
                },
                None => Commit::FenceCleared { cell: drag.origin },
            }
        };
        debug!("drag from {} committed: {:?}", drag.origin_key, commit);
        Transition::Committed(commit)
    }

    /// Click-click gesture: the first click starts a drag, the second commits it.
    pub fn click(&mut self, cell: Cell) -> Transition {
        if self.drag.is_some() {
            self.pointer_up(cell)
        } else {
            self.pointer_down(cell)
        }
    }

    /// Abandons the drag in progress, restoring the state captured when it
    /// started. Returns false if no drag was in progress.
    pub fn cancel(&mut self) -> bool {
        match self.drag.take() {
            Some(drag) => {
                debug!("drag from {} cancelled", drag.origin_key);
                self.fences = drag.fences;
                self.path = drag.path;
                true
            }
            None => false,
        }
    }

    /// Removes every fence. A drag in progress is cancelled first.
    pub fn clear_fences(&mut self) {
        self.cancel();
        self.fences.clear();
    }

    /// Switches off every path edge. A drag in progress is cancelled first.
    pub fn clear_path(&mut self) {
        self.cancel();
        self.path.clear();
    }

    /// Removes one drawn fence. Ignored while a drag is in progress.
    pub fn remove_fence(&mut self, cell: Cell, dir: Direction) -> bool {
        if self.drag.is_some() {
            return false;
        }
        self.fences.remove_direction(cell, dir)
    }

    /// Switches off one drawn path edge. Ignored while a drag is in progress
    /// or when the edge is already off.
    pub fn erase_path(&mut self, edge: EdgeKey) -> bool {
        if self.drag.is_some() || !self.path.is_on(&edge) {
            return false;
        }
        self.path.set(edge, false);
        true
    }

    /// Capacity of `cell` minus the fence length allocated there, or `None`
    /// if the cell is not a resource cell. May go negative.
    pub fn remaining_capacity(&self, cell: Cell) -> Option<i64> {
        let capacity = self.config.capacity(cell)?;
        Some(i64::from(capacity) - self.fences.allocated(cell) as i64)
    }

    /// Remaining capacity as display text; empty for non-resource cells.
    pub fn capacity_label(&self, cell: Cell) -> String {
        self.remaining_capacity(cell)
            .map(|r| r.to_string())
            .unwrap_or_default()
    }

    /// Per-region tally of the active path edges.
    pub fn region_tally(&self) -> RegionTally {
        RegionTally::from_edges(self.path.on_edges())
    }

    /// What the drag in progress would commit if released over the last
    /// hovered cell. A fence drag with no resolved direction, including one
    /// that has not moved yet, previews the origin's entry as removed.
    pub fn preview(&self) -> Option<DragPreview> {
        let drag = self.drag.as_ref()?;
        if drag.path_mode {
            let toggles = drag.toggles(drag.hover);
            Some(DragPreview::Path {
                state: drag.path.merged(&toggles),
                toggles,
            })
        } else {
            Some(DragPreview::Fences(drag.fences_after(drag.hover)))
        }
    }
}
