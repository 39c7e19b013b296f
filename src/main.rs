mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{StorageRequest, StorageResponse, UiEvent};
use crate::state::storage::{self, StorageWorker};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

enum CliAction {
    Exit,
    Run { import: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let import = match handle_cli_args()? {
        CliAction::Exit => return Ok(()),
        CliAction::Run { import } => import,
    };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Info)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let app = App::new();
    let (state_path, export_dir) = (app.settings.state_path.clone(), app.settings.export_dir.clone());
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (storage_req_tx, storage_req_rx) = mpsc::channel::<StorageRequest>(100);
    let (storage_resp_tx, storage_resp_rx) = mpsc::channel::<StorageResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Storage thread
    let storage_worker = StorageWorker::new(state_path, export_dir, storage_req_rx, storage_resp_tx);
    let storage_task = tokio::spawn(storage_worker.run());

    // Animation tick thread, 80ms ≈ 12.5 FPS
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(80));
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });

    // An explicit import replaces whatever was saved
    let startup = match import {
        Some(path) => StorageRequest::Import(Some(path)),
        None => StorageRequest::Load,
    };
    let _ = storage_req_tx.send(startup).await;
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, storage_req_tx, storage_resp_rx).await;

    input_handler.abort();
    storage_task.abort();
    animation_task.abort();

    Ok(())
}

fn handle_cli_args() -> anyhow::Result<CliAction> {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return Ok(CliAction::Run { import: None });
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            Ok(CliAction::Exit)
        }
        "-V" | "--version" => {
            println!("nflbracket {}", env!("CARGO_PKG_VERSION"));
            Ok(CliAction::Exit)
        }
        "--print" => {
            let settings = AppSettings::load();
            match storage::read_saved(&settings.state_path)? {
                Some(json) => println!("{json}"),
                None => eprintln!("no saved bracket at {}", settings.state_path.display()),
            }
            Ok(CliAction::Exit)
        }
        "--import" => {
            let Some(path) = args.next() else {
                eprintln!("--import needs a file\n\n{}", usage_text());
                std::process::exit(2);
            };
            Ok(CliAction::Run { import: Some(PathBuf::from(path)) })
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "nflbracket - NFL playoff bracket builder

Usage:
  nflbracket
  nflbracket --import <file>
  nflbracket --print
  nflbracket --help
  nflbracket --version

Environment:
  NFLBRACKET_LOG      Log level (error, warn, info, debug, trace)
  NFLBRACKET_STATE    Autosave file (default ~/.config/nflbracket/bracket.json)
  NFLBRACKET_IMPORT   File loaded by the import key (default: newest export)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    storage_requests: mpsc::Sender<StorageRequest>,
    mut storage_responses: mpsc::Receiver<StorageResponse>,
) {
    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                if handle_ui_event(ui_event, &app, &storage_requests).await {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard);
                }
            }

            Some(response) = storage_responses.recv() => {
                if handle_storage_response(response, &app, &storage_requests).await {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    storage_requests: &mpsc::Sender<StorageRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            info!("nflbracket {} started", env!("CARGO_PKG_VERSION"));
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, storage_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            if !guard.state.show_intro && !guard.state.loading.is_loading {
                return false;
            }
            guard.advance_animation(crate::components::banner::FRAME_COUNT);
            true
        }
    }
}

async fn handle_storage_response(
    response: StorageResponse,
    app: &Arc<Mutex<App>>,
    storage_requests: &mpsc::Sender<StorageRequest>,
) -> bool {
    let mut guard = app.lock().await;
    match response {
        StorageResponse::LoadingStateChanged { loading_state } => guard.on_loading_state(loading_state),
        StorageResponse::Loaded { snapshot } => guard.on_loaded(snapshot),
        StorageResponse::Saved => return false,
        StorageResponse::Exported { path } => guard.on_exported(path),
        StorageResponse::Imported { snapshot, path } => {
            let save = guard.on_imported(snapshot, path);
            drop(guard);
            let _ = storage_requests.send(save).await;
        }
        StorageResponse::Error { message } => {
            error!("Storage error: {message}");
            guard.on_error(message);
        }
    }
    true
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        cursor::Hide,
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All)
    )?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    // best effort, we may be unwinding
    let _ = execute!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All),
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
