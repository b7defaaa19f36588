//! Tile selection and shutdown shared between the palette and the render loop
//!
//! The palette thread only ever writes the latest chosen id into a single slot.
//! The render loop drains that slot once per frame with `try_lock`, so neither
//! side waits on the other.

use crate::catalog::TileId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, TryLockError};

/// Writer side of the selection slot, cloneable across threads
#[derive(Debug, Clone, Default)]
pub struct SelectionHandle {
    pending: Arc<Mutex<Option<TileId>>>,
}

impl SelectionHandle {
    /// Publish a new selection. Overwrites any selection not yet picked up.
    pub fn select(&self, id: TileId) {
        let mut slot = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(id);
    }

    /// Take the pending selection without blocking
    fn try_take(&self) -> Option<TileId> {
        match self.pending.try_lock() {
            Ok(mut slot) => slot.take(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().take(),
            // Writer holds the lock; pick it up next frame
            Err(TryLockError::WouldBlock) => None,
        }
    }
}

/// Tile id used for painting, owned by the render loop
#[derive(Debug, Clone)]
pub struct SelectionState {
    selected: TileId,
    inbox: SelectionHandle,
}

impl SelectionState {
    pub fn new(initial: TileId) -> Self {
        Self {
            selected: initial,
            inbox: SelectionHandle::default(),
        }
    }

    pub fn selected(&self) -> TileId {
        self.selected
    }

    /// Handle for the palette side
    pub fn handle(&self) -> SelectionHandle {
        self.inbox.clone()
    }

    /// Apply the latest published selection, if any. Never blocks.
    pub fn poll(&mut self) -> Option<TileId> {
        let id = self.inbox.try_take()?;
        self.selected = id;
        Some(id)
    }
}

/// Process-wide quit request raised by whichever context closes first
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
