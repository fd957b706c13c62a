//! Board configuration.
//!
//! Holds the board dimensions, the bounds of the playable diamond and the
//! capacity table of resource cells. A configuration is loaded once at
//! startup and handed to the model; it never changes afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::board::hex::Cell;

/// Built-in capacity table of the standard board.
const DEFAULT_CAPACITIES: [((i32, i32), u32); 14] = [
    ((2, 13), 6),
    ((3, 6), 1),
    ((3, 15), 19),
    ((4, 9), 6),
    ((9, 7), 8),
    ((7, 10), 38),
    ((9, 11), 6),
    ((5, 17), 6),
    ((11, 8), 4),
    ((13, 1), 7),
    ((15, 3), 3),
    ((14, 9), 3),
    ((16, 5), 6),
    ((15, 12), 11),
];

/// Errors that can occur while loading a board configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse board config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("board dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("diamond bounds are inverted: {min_sum} > {max_sum}")]
    InvalidBounds { min_sum: i32, max_sum: i32 },
}

/// Capacities of resource cells. Cells absent from the table (or listed with
/// capacity 0) are not resource cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CapacityTable {
    capacities: BTreeMap<Cell, u32>,
}

impl CapacityTable {
    /// The capacity of `cell`, if it is a resource cell.
    pub fn get(&self, cell: Cell) -> Option<u32> {
        self.capacities.get(&cell).copied().filter(|&c| c > 0)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.get(cell).is_some()
    }

    /// Resource cells with their capacities.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, u32)> + '_ {
        self.capacities
            .iter()
            .filter(|(_, &c)| c > 0)
            .map(|(&cell, &c)| (cell, c))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(Cell, u32)> for CapacityTable {
    fn from_iter<I: IntoIterator<Item = (Cell, u32)>>(iter: I) -> Self {
        CapacityTable {
            capacities: iter.into_iter().collect(),
        }
    }
}

/// Static description of the board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
    /// Smallest `x + y` of a playable cell.
    pub min_sum: i32,
    /// Largest `x + y` of a playable cell.
    pub max_sum: i32,
    pub capacities: CapacityTable,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            width: 19,
            height: 19,
            min_sum: 9,
            max_sum: 27,
            capacities: DEFAULT_CAPACITIES
                .iter()
                .map(|&((x, y), c)| (Cell::new(x, y), c))
                .collect(),
        }
    }
}

impl BoardConfig {
    /// The standard board with a custom capacity table.
    pub fn with_capacities(capacities: CapacityTable) -> Self {
        BoardConfig {
            capacities,
            ..BoardConfig::default()
        }
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!(
            "board config: {}x{}, diamond {}..={}, {} resource cells",
            config.width,
            config.height,
            config.min_sum,
            config.max_sum,
            config.capacities.len()
        );
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        BoardConfig::from_json(&data)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.min_sum > self.max_sum {
            return Err(ConfigError::InvalidBounds {
                min_sum: self.min_sum,
                max_sum: self.max_sum,
            });
        }
        Ok(())
    }

    /// True if `cell` lies inside the playable diamond.
    pub fn contains(&self, cell: Cell) -> bool {
        let s = cell.x + cell.y;
        (0..self.width).contains(&cell.x)
            && (0..self.height).contains(&cell.y)
            && (self.min_sum..=self.max_sum).contains(&s)
    }

    /// All playable cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
            .filter(move |&c| self.contains(c))
    }

    /// The capacity of `cell`, if it is a resource cell.
    pub fn capacity(&self, cell: Cell) -> Option<u32> {
        self.capacities.get(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_board_diamond() {
        let config = BoardConfig::default();
        assert!(config.contains(Cell::new(9, 9)));
        assert!(config.contains(Cell::new(0, 9)));
        assert!(config.contains(Cell::new(18, 9)));
        assert!(!config.contains(Cell::new(0, 8)));
        assert!(!config.contains(Cell::new(18, 10)));
        assert!(!config.contains(Cell::new(19, 0)));
        assert!(!config.contains(Cell::new(-1, 12)));
    }

    #[test]
    fn default_board_cell_count() {
        // 19x19 square minus the two corner triangles of 45 cells each.
        assert_eq!(BoardConfig::default().cells().count(), 19 * 19 - 2 * 45);
    }

    #[test]
    fn default_capacities() {
        let config = BoardConfig::default();
        assert_eq!(config.capacity(Cell::new(7, 10)), Some(38));
        assert_eq!(config.capacity(Cell::new(14, 9)), Some(3));
        assert_eq!(config.capacity(Cell::new(9, 9)), None);
        assert_eq!(config.capacities.len(), 14);
    }

    #[test]
    fn zero_capacity_is_not_a_resource() {
        let table: CapacityTable = [(Cell::new(9, 9), 0), (Cell::new(7, 10), 5)]
            .into_iter()
            .collect();
        assert!(!table.contains(Cell::new(9, 9)));
        assert!(table.contains(Cell::new(7, 10)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn from_json_with_partial_fields() {
        let config = BoardConfig::from_json(r#"{"capacities":{"1-10":4}}"#).unwrap();
        assert_eq!(config.width, 19);
        assert_eq!(config.capacity(Cell::new(1, 10)), Some(4));
        assert_eq!(config.capacity(Cell::new(7, 10)), None);
    }

    #[test]
    fn from_json_rejects_bad_input() {
        assert!(matches!(
            BoardConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            BoardConfig::from_json(r#"{"width":0}"#),
            Err(ConfigError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            BoardConfig::from_json(r#"{"min_sum":30,"max_sum":10}"#),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn load_missing_file() {
        let err = BoardConfig::load(Path::new("/nonexistent/board.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
