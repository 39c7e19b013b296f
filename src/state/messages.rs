use crate::state::storage::LoadingState;
use bracket_engine::Snapshot;
use crossterm::event::KeyEvent;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum StorageRequest {
    /// Read the autosaved bracket, if any.
    Load,
    /// Autosave. `None` removes the saved bracket.
    Save(Option<Snapshot>),
    Export(Snapshot),
    /// Import from a file, or the newest export when no path is given.
    Import(Option<PathBuf>),
}

#[derive(Debug)]
pub enum StorageResponse {
    Loaded { snapshot: Option<Snapshot> },
    Saved,
    Exported { path: PathBuf },
    Imported { snapshot: Snapshot, path: PathBuf },
    LoadingStateChanged { loading_state: LoadingState },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    AnimationTick,
}
