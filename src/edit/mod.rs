//! Editing primitives: direction resolution, fence allocations and path
//! toggling.

pub mod fence;
pub mod resolve;
pub mod toggle;

pub use fence::{FenceAllocation, FenceEntry};
pub use resolve::{projection, resolve, resolve_between, Resolution};
pub use toggle::{toggle_walk, walk_cells, walk_edges, EdgeKey, PathState};
