//! Editing session: a model bound to a snapshot store.
//!
//! `Session::open` restores the saved mappings once at startup; after that
//! every committed change is flushed back to the store. Drag moves and
//! ignored events never touch the store.

use log::debug;

use crate::board::hex::{Cell, Direction};
use crate::config::BoardConfig;
use crate::edit::toggle::EdgeKey;
use crate::model::{GridModel, Transition};
use crate::persist::{Snapshot, SnapshotStore, StoreError};

/// A [`GridModel`] that writes its committed state to a [`SnapshotStore`].
///
/// Event methods mirror the model's. Those that can commit return the
/// store's error when the write fails; the model keeps the change either way.
pub struct Session<S: SnapshotStore> {
    model: GridModel,
    store: S,
}

impl<S: SnapshotStore> Session<S> {
    /// Opens a session, restoring whatever `store` holds. Malformed or
    /// missing data starts an empty board.
    pub fn open(config: BoardConfig, store: S) -> Self {
        let snapshot = Snapshot::restore(&store);
        debug!(
            "session restored {} fenced cells, {} path edges",
            snapshot.connected.len(),
            snapshot.path.count_on()
        );
        Session {
            model: GridModel::with_state(config, snapshot.connected, snapshot.path),
            store,
        }
    }

    /// The model being edited.
    pub fn model(&self) -> &GridModel {
        &self.model
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the session, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Writes the committed state to the store.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        Snapshot::of(&self.model).save(&mut self.store)
    }

    fn flush_if(&mut self, changed: bool) -> Result<(), StoreError> {
        if changed {
            self.flush()?;
        }
        Ok(())
    }

    fn after(&mut self, transition: Transition) -> Result<Transition, StoreError> {
        self.flush_if(transition.is_commit())?;
        Ok(transition)
    }

    /// Starts a drag. Never writes.
    pub fn pointer_down(&mut self, cell: Cell) -> Transition {
        self.model.pointer_down(cell)
    }

    /// Updates the hovered direction. Never writes.
    pub fn pointer_move(&mut self, cell: Cell) -> Transition {
        self.model.pointer_move(cell)
    }

    /// Commits the drag and flushes if anything was committed.
    pub fn pointer_up(&mut self, cell: Cell) -> Result<Transition, StoreError> {
        let t = self.model.pointer_up(cell);
        self.after(t)
    }

    /// Click-click gesture; flushes when the second click commits.
    pub fn click(&mut self, cell: Cell) -> Result<Transition, StoreError> {
        let t = self.model.click(cell);
        self.after(t)
    }

    /// Cancels the drag in progress. Nothing was committed, so nothing is
    /// written.
    pub fn cancel(&mut self) -> bool {
        self.model.cancel()
    }

    /// Removes every fence and flushes.
    pub fn clear_fences(&mut self) -> Result<(), StoreError> {
        self.model.clear_fences();
        self.flush()
    }

    /// Clears the path and flushes.
    pub fn clear_path(&mut self) -> Result<(), StoreError> {
        self.model.clear_path();
        self.flush()
    }

    /// Removes one fence direction, flushing only if it existed.
    pub fn remove_fence(&mut self, cell: Cell, dir: Direction) -> Result<bool, StoreError> {
        let removed = self.model.remove_fence(cell, dir);
        self.flush_if(removed)?;
        Ok(removed)
    }

    /// Switches one path edge off, flushing only if the model accepted it.
    pub fn erase_path(&mut self, edge: EdgeKey) -> Result<bool, StoreError> {
        let erased = self.model.erase_path(edge);
        self.flush_if(erased)?;
        Ok(erased)
    }
}
