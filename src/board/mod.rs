//! Board geometry.
//!
//! Contains the hex lattice coordinates and directions and the static
//! region classifier used for scoring.

pub mod hex;
pub mod region;

pub use hex::{to_cartesian, Cell, Direction, KeyError, DIRECTION_COUNT};
pub use region::{Region, RegionTally};
