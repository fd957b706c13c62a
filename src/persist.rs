//! Snapshot persistence.
//!
//! The saved state is a JSON object holding the two mappings:
//!
//! ```json
//! {"connected": {"7-10": {"3": 1}}, "path": {"9-10,9-9": true}}
//! ```
//!
//! Snapshots live in a key-value store under [`STATE_KEY`]. Restoring never
//! fails: absent, unreadable, malformed or out-of-range data yields an empty
//! snapshot.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::board::hex::{Cell, Direction};
use crate::edit::fence::FenceAllocation;
use crate::edit::toggle::PathState;
use crate::model::GridModel;

/// Store key the snapshot is saved under.
pub const STATE_KEY: &str = "state";

/// Largest absolute coordinate accepted in a loaded snapshot.
pub const MAX_COORDINATE: i32 = 1 << 16;
/// Largest fence length accepted in a loaded snapshot.
pub const MAX_FENCE_LENGTH: u32 = 1 << 16;

/// Errors raised while decoding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cell {0} is outside the accepted coordinate range")]
    CellOutOfRange(Cell),

    #[error("fence at {cell} towards {direction:?} has length {length}, above the limit")]
    FenceTooLong {
        cell: Cell,
        direction: Direction,
        length: u32,
    },
}

/// Errors raised by snapshot stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Serializable copy of the two persistent mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub connected: FenceAllocation,
    #[serde(default)]
    pub path: PathState,
}

impl Snapshot {
    /// Captures the committed state of a model.
    pub fn of(model: &GridModel) -> Self {
        Snapshot {
            connected: model.fences().clone(),
            path: model.path().clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a snapshot and checks that every cell and length is within
    /// [`MAX_COORDINATE`] and [`MAX_FENCE_LENGTH`].
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let mut snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.connected.normalize();
        snapshot.check_bounds()?;
        Ok(snapshot)
    }

    fn check_bounds(&self) -> Result<(), SnapshotError> {
        let in_range = |c: Cell| {
            let range = -MAX_COORDINATE..=MAX_COORDINATE;
            range.contains(&c.x) && range.contains(&c.y)
        };
        for (cell, entry) in self.connected.iter() {
            if !in_range(cell) {
                return Err(SnapshotError::CellOutOfRange(cell));
            }
            if let Some((&direction, &length)) =
                entry.iter().find(|(_, &len)| len > MAX_FENCE_LENGTH)
            {
                return Err(SnapshotError::FenceTooLong {
                    cell,
                    direction,
                    length,
                });
            }
        }
        for (edge, _) in self.path.entries() {
            let (a, b) = edge.cells();
            if let Some(cell) = [a, b].into_iter().find(|&c| !in_range(c)) {
                return Err(SnapshotError::CellOutOfRange(cell));
            }
        }
        Ok(())
    }

    /// Loads the snapshot from `store`, falling back to an empty snapshot on
    /// any failure.
    pub fn restore<S: SnapshotStore + ?Sized>(store: &S) -> Self {
        let raw = match store.load(STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no saved state, starting empty");
                return Snapshot::default();
            }
            Err(e) => {
                warn!("could not read saved state, starting empty: {}", e);
                return Snapshot::default();
            }
        };
        Snapshot::from_json(&raw).unwrap_or_else(|e| {
            warn!("ignoring malformed saved state: {}", e);
            Snapshot::default()
        })
    }

    /// Writes the snapshot to `store`.
    pub fn save<S: SnapshotStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        let json = self.to_json()?;
        store.save(STATE_KEY, &json)
    }
}

/// A string key-value store.
pub trait SnapshotStore {
    /// Returns the value for `key`, or `None` if nothing was stored.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Store kept in memory; contents are lost with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Returns the raw stored value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.insert(key, value);
        Ok(())
    }
}

/// Store that keeps each key in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let io_err = |source: io::Error| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        // Write then rename so a crash never leaves a truncated snapshot.
        let target = self.path_for(key);
        let tmp = target.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &target).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::edit::toggle::EdgeKey;
    use crate::view;

    fn sample() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.connected.set(Cell::new(7, 10), Direction::East, 1);
        snapshot
            .path
            .set(EdgeKey::between(Cell::new(9, 9), Cell::new(9, 10)), true);
        snapshot
    }

    #[test]
    fn json_shape() {
        assert_eq!(
            sample().to_json().unwrap(),
            r#"{"connected":{"7-10":{"3":1}},"path":{"9-10,9-9":true}}"#
        );
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let snapshot = Snapshot::from_json(r#"{"path":{"9-10,9-9":false}}"#).unwrap();
        assert!(snapshot.connected.is_empty());
        assert_eq!(snapshot.path.len(), 1);
        assert_eq!(Snapshot::from_json("{}").unwrap(), Snapshot::default());
    }

    #[test]
    fn restore_from_empty_store() {
        let store = MemoryStore::new();
        assert_eq!(Snapshot::restore(&store), Snapshot::default());
    }

    #[test]
    fn restore_ignores_malformed_data() {
        let mut store = MemoryStore::new();
        let inputs = [
            "not json",
            "null",
            "[1,2]",
            r#"{"connected":{"x":{"3":1}}}"#,
            r#"{"connected":{"7-10":{"9":1}}}"#,
            r#"{"connected":{"7-10":{"3":-1}}}"#,
            r#"{"path":{"9-9":true}}"#,
        ];
        for raw in inputs {
            store.insert(STATE_KEY, raw);
            assert_eq!(Snapshot::restore(&store), Snapshot::default(), "input {}", raw);
        }
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(matches!(
            Snapshot::from_json(r#"{"path":{"2147483647-1,2147483647-2":true}}"#),
            Err(SnapshotError::CellOutOfRange(_))
        ));
        assert!(matches!(
            Snapshot::from_json(r#"{"connected":{"7-10":{"3":2147483647}}}"#),
            Err(SnapshotError::FenceTooLong { length: 2147483647, .. })
        ));
        assert!(matches!(
            Snapshot::from_json(r#"{"connected":{"-2147483648-0":{"3":1}}}"#),
            Err(SnapshotError::CellOutOfRange(_))
        ));
        let edge = format!(r#"{{"path":{{"{0}-1,{0}-2":true}}}}"#, MAX_COORDINATE);
        assert_eq!(Snapshot::from_json(&edge).unwrap().path.count_on(), 1);
    }

    #[test]
    fn extreme_saved_state_restores_empty() {
        let mut store = MemoryStore::new();
        for raw in [
            r#"{"path":{"2147483647-1,2147483647-2":true}}"#,
            r#"{"connected":{"7-10":{"3":2147483647}}}"#,
        ] {
            store.insert(STATE_KEY, raw);
            let snapshot = Snapshot::restore(&store);
            assert_eq!(snapshot, Snapshot::default(), "input {}", raw);

            let model = GridModel::with_state(
                BoardConfig::default(),
                snapshot.connected,
                snapshot.path,
            );
            assert_eq!(model.region_tally().product(), 1.0);
            assert!(view::fence_segments(model.fences()).is_empty());
            assert_eq!(model.remaining_capacity(Cell::new(7, 10)), Some(38));
        }
    }

    #[test]
    fn save_then_restore_memory() {
        let mut store = MemoryStore::new();
        sample().save(&mut store).unwrap();
        assert!(store.get(STATE_KEY).is_some());
        assert_eq!(Snapshot::restore(&store), sample());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.load(STATE_KEY).unwrap(), None);
        sample().save(&mut store).unwrap();

        let reopened = FileStore::new(dir.path().join("nested"));
        assert_eq!(Snapshot::restore(&reopened), sample());
    }

    #[test]
    fn file_store_read_error_restores_empty() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the read fail.
        fs::create_dir_all(dir.path().join("state.json")).unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.load(STATE_KEY).is_err());
        assert_eq!(Snapshot::restore(&store), Snapshot::default());
    }
}
