//! Hexfence engine library.
//!
//! Interaction core of a hexagonal board planner: lattice geometry, drag
//! resolution, fence and path editing, region scoring and snapshot
//! persistence. Rendering is left to the caller; see [`view`] for the data a
//! rendering surface consumes.

pub mod board;
pub mod config;
pub mod edit;
pub mod model;
pub mod persist;
pub mod session;
pub mod view;

pub use board::{Cell, Direction, Region, RegionTally};
pub use config::{BoardConfig, CapacityTable, ConfigError};
pub use edit::{EdgeKey, FenceAllocation, PathState, Resolution};
pub use model::{Commit, DragPreview, DragSnapshot, GridModel, Transition};
pub use persist::{FileStore, MemoryStore, Snapshot, SnapshotError, SnapshotStore, StoreError};
pub use session::Session;
