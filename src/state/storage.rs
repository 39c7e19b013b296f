use crate::state::messages::{StorageRequest, StorageResponse};
use anyhow::{Context, anyhow};
use bracket_engine::{Snapshot, bracket};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';
const EXPORT_PREFIX: &str = "nfl-bracket-";

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Owns every file the app touches: the autosave and the export directory.
pub struct StorageWorker {
    state_path: PathBuf,
    export_dir: PathBuf,
    requests: mpsc::Receiver<StorageRequest>,
    responses: mpsc::Sender<StorageResponse>,
    is_loading: Arc<AtomicBool>,
}

impl StorageWorker {
    pub fn new(
        state_path: PathBuf,
        export_dir: PathBuf,
        requests: mpsc::Receiver<StorageRequest>,
        responses: mpsc::Sender<StorageResponse>,
    ) -> Self {
        Self {
            state_path,
            export_dir,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            // autosaves are silent, everything else spins
            let animate = !matches!(request, StorageRequest::Save(_));
            if animate {
                self.start_loading_animation().await;
            }

            let result = match request {
                StorageRequest::Load => self.handle_load().await,
                StorageRequest::Save(snapshot) => self.handle_save(snapshot).await,
                StorageRequest::Export(snapshot) => self.handle_export(snapshot).await,
                StorageRequest::Import(path) => self.handle_import(path).await,
            };

            if animate {
                self.stop_loading_animation(result.is_ok()).await;
            }

            let response = result.unwrap_or_else(|err| {
                warn!("storage request failed: {err:#}");
                StorageResponse::Error { message: format!("{err:#}") }
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send storage response: {e}");
                break;
            }
        }
    }

    async fn handle_load(&self) -> anyhow::Result<StorageResponse> {
        let path = &self.state_path;
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            debug!("no saved bracket at {}", path.display());
            return Ok(StorageResponse::Loaded { snapshot: None });
        }
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        // a corrupt autosave is dropped rather than blocking startup
        let snapshot = match bracket::from_json(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("ignoring unreadable save at {}: {e}", path.display());
                None
            }
        };
        Ok(StorageResponse::Loaded { snapshot })
    }

    async fn handle_save(&self, snapshot: Option<Snapshot>) -> anyhow::Result<StorageResponse> {
        let path = &self.state_path;
        match snapshot {
            Some(snapshot) => {
                let json = bracket::to_json(&snapshot)?;
                write_file(path, &json).await?;
                debug!("saved bracket ({} picks) to {}", snapshot.picks_made(), path.display());
            }
            None => {
                if tokio::fs::try_exists(path).await.unwrap_or(false) {
                    tokio::fs::remove_file(path)
                        .await
                        .with_context(|| format!("removing {}", path.display()))?;
                    debug!("removed saved bracket at {}", path.display());
                }
            }
        }
        Ok(StorageResponse::Saved)
    }

    async fn handle_export(&self, snapshot: Snapshot) -> anyhow::Result<StorageResponse> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let path = self.export_dir.join(format!("{EXPORT_PREFIX}{stamp}.json"));
        let json = bracket::to_json(&snapshot)?;
        write_file(&path, &json).await?;
        info!("exported bracket to {}", path.display());
        Ok(StorageResponse::Exported { path })
    }

    async fn handle_import(&self, path: Option<PathBuf>) -> anyhow::Result<StorageResponse> {
        let path = match path {
            Some(path) => path,
            None => latest_export(&self.export_dir)
                .await?
                .ok_or_else(|| anyhow!("no exports found in {}", self.export_dir.display()))?,
        };
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let snapshot = bracket::from_json(&raw)?;
        info!("imported bracket from {}", path.display());
        Ok(StorageResponse::Imported { snapshot, path })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(StorageResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(StorageResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(StorageResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

async fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("writing {}", path.display()))
}

/// Export names embed a sortable timestamp, so the newest is the greatest name.
async fn latest_export(dir: &Path) -> anyhow::Result<Option<PathBuf>> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Ok(None);
    }
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("listing {}", dir.display()))?;
    let mut newest: Option<PathBuf> = None;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_export = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(EXPORT_PREFIX) && n.ends_with(".json"));
        if is_export && newest.as_ref().is_none_or(|best| path > *best) {
            newest = Some(path);
        }
    }
    Ok(newest)
}

/// Blocking read of the autosave for `--print`.
pub fn read_saved(path: &Path) -> anyhow::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Some(raw))
}
