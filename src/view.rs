//! Render-ready views of a model.
//!
//! A rendering surface draws one polygon per playable cell, one line per
//! fence and one line per active path edge. The functions here produce the
//! data for those elements in board coordinates; projecting them to pixels
//! is up to the surface.

use crate::board::hex::{Cell, Direction};
use crate::board::region::Region;
use crate::edit::fence::FenceAllocation;
use crate::edit::toggle::{EdgeKey, PathState};
use crate::model::{DragPreview, GridModel};

/// Display data for one playable cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub cell: Cell,
    /// Remaining capacity as text, empty for non-resource cells.
    pub label: String,
    pub region: Region,
    /// Set on the origin cell of the drag in progress.
    pub highlighted: bool,
}

/// A drawn fence: `length` steps from `cell` in `direction`, ending at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceSegment {
    pub cell: Cell,
    pub direction: Direction,
    pub length: u32,
    pub end: Cell,
}

/// A drawn path edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment {
    pub edge: EdgeKey,
    pub from: Cell,
    pub to: Cell,
}

/// Every playable cell, row by row.
pub fn cells(model: &GridModel) -> Vec<CellView> {
    model
        .config()
        .cells()
        .map(|cell| CellView {
            cell,
            label: model.capacity_label(cell),
            region: Region::of(cell),
            highlighted: model.is_drag_origin(cell),
        })
        .collect()
}

/// One segment per allocated fence direction, in cell then direction order.
pub fn fence_segments(fences: &FenceAllocation) -> Vec<FenceSegment> {
    fences
        .iter()
        .flat_map(|(cell, entry)| {
            entry
                .iter()
                .filter(|(_, &len)| len > 0)
                .map(move |(&direction, &length)| {
                    let steps = i32::try_from(length).unwrap_or(i32::MAX);
                    FenceSegment {
                        cell,
                        direction,
                        length,
                        end: cell.offset_by(direction, steps),
                    }
                })
        })
        .collect()
}

/// One segment per edge switched on; off entries are skipped.
pub fn path_segments(path: &PathState) -> Vec<PathSegment> {
    path.on_edges()
        .map(|&edge| {
            let (from, to) = edge.cells();
            PathSegment { edge, from, to }
        })
        .collect()
}

/// Segments to draw for the current frame: committed state, or the pending
/// drag result while a drag is in progress.
pub fn frame_segments(model: &GridModel) -> (Vec<FenceSegment>, Vec<PathSegment>) {
    match model.preview() {
        Some(DragPreview::Fences(fences)) => {
            (fence_segments(&fences), path_segments(model.path()))
        }
        Some(DragPreview::Path { state, .. }) => {
            (fence_segments(model.fences()), path_segments(&state))
        }
        None => (fence_segments(model.fences()), path_segments(model.path())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;

    #[test]
    fn cell_views_cover_the_board() {
        let model = GridModel::new(BoardConfig::default());
        let views = cells(&model);
        assert_eq!(views.len(), 271);
        let resource = views.iter().find(|v| v.cell == Cell::new(7, 10)).unwrap();
        assert_eq!(resource.label, "38");
        assert_eq!(resource.region, Region::Purple);
        let centre = views.iter().find(|v| v.cell == Cell::new(9, 9)).unwrap();
        assert_eq!(centre.label, "");
        assert_eq!(centre.region, Region::White);
        assert!(views.iter().all(|v| !v.highlighted));
    }

    #[test]
    fn drag_origin_is_highlighted() {
        let mut model = GridModel::new(BoardConfig::default());
        model.pointer_down(Cell::new(4, 9));
        let views = cells(&model);
        let lit: Vec<_> = views.iter().filter(|v| v.highlighted).map(|v| v.cell).collect();
        assert_eq!(lit, vec![Cell::new(4, 9)]);
    }

    #[test]
    fn fence_segment_end_points() {
        let mut fences = FenceAllocation::new();
        fences.set(Cell::new(7, 10), Direction::East, 3);
        fences.set(Cell::new(7, 10), Direction::NorthWest, 2);
        let segs = fence_segments(&fences);
        assert_eq!(segs.len(), 2);
        assert!(segs.contains(&FenceSegment {
            cell: Cell::new(7, 10),
            direction: Direction::East,
            length: 3,
            end: Cell::new(10, 10),
        }));
        assert!(segs.iter().any(|s| s.end == Cell::new(7, 8)));
    }

    #[test]
    fn oversized_fence_end_saturates() {
        let mut fences = FenceAllocation::new();
        fences.set(Cell::new(7, 10), Direction::East, u32::MAX);
        let segs = fence_segments(&fences);
        assert_eq!(segs[0].end, Cell::new(i32::MAX, 10));
    }

    #[test]
    fn path_segments_skip_switched_off_edges() {
        let mut path = PathState::new();
        let on = EdgeKey::between(Cell::new(9, 9), Cell::new(9, 10));
        path.set(on, true);
        path.set(EdgeKey::between(Cell::new(9, 9), Cell::new(10, 9)), false);
        let segs = path_segments(&path);
        assert_eq!(segs.len(), 1);
        assert_eq!((segs[0].from, segs[0].to), (Cell::new(9, 10), Cell::new(9, 9)));
    }

    #[test]
    fn frame_shows_pending_drag() {
        let mut model = GridModel::new(BoardConfig::default());
        model.pointer_down(Cell::new(9, 9));
        model.pointer_move(Cell::new(11, 9));
        let (fences, paths) = frame_segments(&model);
        assert!(fences.is_empty());
        assert_eq!(paths.len(), 2);
        model.cancel();
        let (_, paths) = frame_segments(&model);
        assert!(paths.is_empty());
    }
}
