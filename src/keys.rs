use crate::app::{App, MenuItem, Side};
use crate::state::messages::StorageRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    storage_requests: &mpsc::Sender<StorageRequest>,
) {
    let mut guard = app.lock().await;

    if guard.state.show_intro {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Enter, _) | (Char(' '), _) => guard.dismiss_intro(),
            (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            _ => {}
        }
        return;
    }

    let request = match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => {
            guard.update_tab(MenuItem::SeedEntry);
            None
        }
        (_, Char('2'), _) => {
            guard.update_tab(MenuItem::Bracket);
            None
        }
        (_, Char('?'), _) => {
            guard.update_tab(MenuItem::Help);
            None
        }
        (MenuItem::Help, KeyCode::Esc, _) => {
            guard.exit_help();
            None
        }

        // Seed entry
        (MenuItem::SeedEntry, Char('j') | KeyCode::Down, _) => {
            guard.state.seeds.navigate_down();
            None
        }
        (MenuItem::SeedEntry, Char('k') | KeyCode::Up, _) => {
            guard.state.seeds.navigate_up();
            None
        }
        (MenuItem::SeedEntry, Char('h' | 'l') | KeyCode::Left | KeyCode::Right | KeyCode::Tab, _) => {
            guard.state.seeds.switch_conference();
            None
        }
        (MenuItem::SeedEntry, Char('n'), _) => {
            guard.state.seeds.cycle_team(true);
            None
        }
        (MenuItem::SeedEntry, Char('p'), _) => {
            guard.state.seeds.cycle_team(false);
            None
        }
        (MenuItem::SeedEntry, KeyCode::Backspace | KeyCode::Delete, _) => {
            guard.state.seeds.clear_selected();
            None
        }
        (MenuItem::SeedEntry, Char('L'), _) => {
            guard.state.seeds.load_2025();
            None
        }
        (MenuItem::SeedEntry, KeyCode::Enter, _) => guard.generate_bracket(),

        // Bracket navigation
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => {
            guard.bracket_next_round();
            None
        }
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => {
            guard.bracket_prev_round();
            None
        }
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => {
            guard.bracket_game_down();
            None
        }
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => {
            guard.bracket_game_up();
            None
        }
        (MenuItem::Bracket, Char('c'), _) => {
            guard.bracket_cycle_conference();
            None
        }

        // Bracket edits
        (MenuItem::Bracket, Char('['), _) => guard.pick(Side::Home),
        (MenuItem::Bracket, Char(']'), _) => guard.pick(Side::Away),
        (MenuItem::Bracket, Char('u'), _) => guard.undo(),
        (MenuItem::Bracket, Char('x'), _) => guard.randomize(),
        (MenuItem::Bracket, Char('R'), _) => guard.reset_picks(),
        (MenuItem::Bracket, Char('N'), _) => Some(guard.new_bracket()),
        (MenuItem::Bracket, Char('e'), _) => guard.export_request(),

        // Global
        (_, Char('i'), _) => Some(guard.import_request()),
        (_, Char('f'), _) => {
            guard.toggle_full_screen();
            None
        }
        (_, Char('"'), _) => {
            guard.toggle_show_logs();
            None
        }

        _ => None,
    };

    if let Some(request) = request {
        drop(guard);
        let _ = storage_requests.send(request).await;
    }
}
