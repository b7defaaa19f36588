//! Palette picker model and its worker thread
//!
//! The palette runs in its own execution context: a thread blocked on a channel
//! of `PaletteEvent`s. Whatever front end presents the buttons only sends events;
//! the worker turns them into selection updates and the shutdown request.

use crate::catalog::{TileCatalog, TileId};
use crate::selection::{SelectionHandle, ShutdownSignal};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// One button in the palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub id: TileId,
    pub label: String,
}

/// Palette buttons for every catalog entry, in id order
pub fn palette_entries(catalog: &TileCatalog) -> Vec<PaletteEntry> {
    catalog
        .iter()
        .map(|tile| PaletteEntry {
            id: tile.id,
            label: format!("{} (ID {})", tile.name, tile.id),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteEvent {
    /// A palette button was activated
    Activate(TileId),
    /// The palette window was closed
    Close,
}

/// Sending side used by palette front ends
#[derive(Debug, Clone)]
pub struct PaletteSender(Sender<PaletteEvent>);

impl PaletteSender {
    /// Queue an event for the worker. Returns false if the worker has exited.
    pub fn send(&self, event: PaletteEvent) -> bool {
        self.0.send(event).is_ok()
    }
}

/// Running palette thread
pub struct PaletteWorker {
    sender: PaletteSender,
    thread: JoinHandle<()>,
}

impl PaletteWorker {
    /// Start the palette thread
    pub fn spawn(selection: SelectionHandle, shutdown: ShutdownSignal) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("palette".to_string())
            .spawn(move || run_palette(rx, selection, shutdown))?;

        Ok(Self {
            sender: PaletteSender(tx),
            thread,
        })
    }

    pub fn sender(&self) -> PaletteSender {
        self.sender.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Close the palette and wait for the thread to exit
    pub fn close(self) {
        self.sender.send(PaletteEvent::Close);
        if self.thread.join().is_err() {
            log::error!("Palette thread panicked");
        }
    }
}

fn run_palette(
    events: Receiver<PaletteEvent>,
    selection: SelectionHandle,
    shutdown: ShutdownSignal,
) {
    loop {
        match events.recv() {
            Ok(PaletteEvent::Activate(id)) => {
                selection.select(id);
                log::info!("Selected tile ID: {}", id);
            }
            // Every sender dropped counts as the palette going away
            Ok(PaletteEvent::Close) | Err(_) => {
                shutdown.request();
                return;
            }
        }
    }
}
