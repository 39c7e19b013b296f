use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::messages::StorageRequest;
use crate::state::storage::LoadingState;
use bracket_engine::{BracketResult, Snapshot, bracket};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    SeedEntry,
    Bracket,
    Help,
}

/// Which side of the selected matchup a pick goes to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Side {
    Home,
    Away,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Storage response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_loaded(&mut self, snapshot: Option<Snapshot>) {
        let Some(snapshot) = snapshot else {
            info!("no saved bracket, starting at seed entry");
            return;
        };
        info!("restored bracket with {} picks", snapshot.picks_made());
        self.install(snapshot);
    }

    /// Returns the autosave for the imported bracket.
    pub fn on_imported(&mut self, snapshot: Snapshot, path: PathBuf) -> StorageRequest {
        self.state.last_error = None;
        self.state.last_info = Some(format!("imported {}", path.display()));
        self.install(snapshot.clone());
        StorageRequest::Save(Some(snapshot))
    }

    pub fn on_exported(&mut self, path: PathBuf) {
        self.state.last_error = None;
        self.state.last_info = Some(format!("exported to {}", path.display()));
    }

    pub fn on_loading_state(&mut self, loading_state: LoadingState) {
        self.state.loading = loading_state;
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    fn install(&mut self, snapshot: Snapshot) {
        self.state.seeds.fill_from(&snapshot.entrants);
        self.state.bracket.load(snapshot);
        self.update_tab(MenuItem::Bracket);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_intro(&mut self) {
        self.state.show_intro = false;
    }

    // -----------------------------------------------------------------------
    // Seed entry
    // -----------------------------------------------------------------------

    /// Build a fresh bracket from the seed grid.
    pub fn generate_bracket(&mut self) -> Option<StorageRequest> {
        let entrants = match self.state.seeds.entrants() {
            Ok(entrants) => entrants,
            Err(message) => {
                self.on_error(message);
                return None;
            }
        };
        let snapshot = match bracket::initialize(entrants) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.on_error(e.to_string());
                return None;
            }
        };
        self.state.last_error = None;
        self.state.last_info = Some("bracket generated".to_string());
        self.state.bracket.load(snapshot.clone());
        self.update_tab(MenuItem::Bracket);
        Some(StorageRequest::Save(Some(snapshot)))
    }

    // -----------------------------------------------------------------------
    // Bracket navigation, delegated to BracketState
    // -----------------------------------------------------------------------

    pub fn bracket_next_round(&mut self) {
        self.state.bracket.navigate_round_next();
    }

    pub fn bracket_prev_round(&mut self) {
        self.state.bracket.navigate_round_prev();
    }

    pub fn bracket_game_down(&mut self) {
        self.state.bracket.navigate_game_down();
    }

    pub fn bracket_game_up(&mut self) {
        self.state.bracket.navigate_game_up();
    }

    pub fn bracket_cycle_conference(&mut self) {
        self.state.bracket.cycle_conference();
    }

    // -----------------------------------------------------------------------
    // Bracket edits. Each returns the autosave request on success.
    // -----------------------------------------------------------------------

    pub fn pick(&mut self, side: Side) -> Option<StorageRequest> {
        let Some(matchup) = self.state.bracket.selected_matchup() else {
            self.on_error("no matchup selected".to_string());
            return None;
        };
        let winner = match side {
            Side::Home => &matchup.home,
            Side::Away => &matchup.away,
        };
        let (matchup_id, winner_id) = (matchup.id.clone(), winner.id.clone());
        let name = winner.name.clone();
        let snapshot = self.state.bracket.snapshot.as_ref()?;
        let result = bracket::record_winner(snapshot, &matchup_id, &winner_id);
        let request = self.transition(result)?;
        if let Some(champion) = self.state.bracket.snapshot.as_ref().and_then(Snapshot::champion) {
            self.state.last_info = Some(format!("{} win it all", champion.name));
        } else {
            self.state.last_info = Some(format!("{name} advance"));
        }
        Some(request)
    }

    pub fn undo(&mut self) -> Option<StorageRequest> {
        if !self.state.bracket.undo() {
            self.on_error("nothing to undo".to_string());
            return None;
        }
        self.state.last_error = None;
        self.state.last_info = Some("undone".to_string());
        self.state.bracket.snapshot.clone().map(|s| StorageRequest::Save(Some(s)))
    }

    pub fn randomize(&mut self) -> Option<StorageRequest> {
        let snapshot = self.state.bracket.snapshot.as_ref()?;
        let result = bracket::randomize_picks(snapshot, &mut rand::thread_rng());
        let request = self.transition(result)?;
        self.state.last_info = Some("random picks filled in".to_string());
        Some(request)
    }

    pub fn reset_picks(&mut self) -> Option<StorageRequest> {
        let snapshot = self.state.bracket.snapshot.as_ref()?;
        let result = bracket::reset_picks(snapshot);
        let request = self.transition(result)?;
        self.state.last_info = Some("picks cleared".to_string());
        Some(request)
    }

    /// Drop the bracket and go back to seed entry. The seed grid is kept.
    pub fn new_bracket(&mut self) -> StorageRequest {
        self.state.bracket.clear();
        self.state.last_error = None;
        self.state.last_info = Some("bracket discarded".to_string());
        self.update_tab(MenuItem::SeedEntry);
        StorageRequest::Save(None)
    }

    pub fn export_request(&mut self) -> Option<StorageRequest> {
        match self.state.bracket.snapshot.clone() {
            Some(snapshot) => Some(StorageRequest::Export(snapshot)),
            None => {
                self.on_error("nothing to export yet".to_string());
                None
            }
        }
    }

    pub fn import_request(&self) -> StorageRequest {
        StorageRequest::Import(self.settings.import_path.clone())
    }

    fn transition(&mut self, result: BracketResult<Snapshot>) -> Option<StorageRequest> {
        match result {
            Ok(next) => {
                self.state.last_error = None;
                self.state.bracket.apply(next.clone());
                Some(StorageRequest::Save(Some(next)))
            }
            Err(e) => {
                warn!("bracket edit rejected: {e}");
                self.on_error(e.to_string());
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Animation tick, called every 80ms from AnimationTick event
    // -----------------------------------------------------------------------

    pub fn advance_animation(&mut self, frame_count: usize) {
        self.state.animation.advance(frame_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_engine::RoundKind;
    use bracket_engine::teams::seeds_2025;

    fn app_with_bracket() -> App {
        let mut app = App::new();
        app.state.seeds.load_2025();
        assert!(app.generate_bracket().is_some());
        app
    }

    #[test]
    fn generate_needs_every_seed() {
        let mut app = App::new();
        assert!(app.generate_bracket().is_none());
        assert_eq!(app.state.last_error.as_deref(), Some("AFC seed 1 is empty"));
        assert_eq!(app.state.active_tab, MenuItem::SeedEntry);
    }

    #[test]
    fn generate_switches_to_bracket() {
        let app = app_with_bracket();
        assert_eq!(app.state.active_tab, MenuItem::Bracket);
        let snapshot = app.state.bracket.snapshot.as_ref().unwrap();
        assert_eq!(snapshot.matchups.len(), 6);
    }

    #[test]
    fn picking_a_full_round_opens_the_next() {
        let mut app = app_with_bracket();
        for _ in 0..3 {
            assert!(matches!(app.pick(Side::Home), Some(StorageRequest::Save(Some(_)))));
            app.bracket_game_down();
        }
        let snapshot = app.state.bracket.snapshot.as_ref().unwrap();
        assert_eq!(snapshot.matchups_in(bracket_engine::Conference::Afc, RoundKind::Divisional).len(), 2);

        app.bracket_next_round();
        assert_eq!(app.state.bracket.selected_matchup().unwrap().id, "div-AFC-1");
    }

    #[test]
    fn pick_without_matchup_reports_error() {
        let mut app = app_with_bracket();
        app.bracket_next_round();
        assert!(app.pick(Side::Away).is_none());
        assert!(app.state.last_error.is_some());
    }

    #[test]
    fn randomize_then_undo() {
        let mut app = app_with_bracket();
        assert!(app.randomize().is_some());
        assert!(app.state.bracket.snapshot.as_ref().unwrap().is_complete());
        assert!(app.state.last_info.is_some());

        assert!(app.undo().is_some());
        assert_eq!(app.state.bracket.snapshot.as_ref().unwrap().picks_made(), 0);
        assert!(app.undo().is_none());
    }

    #[test]
    fn new_bracket_clears_save_and_keeps_seeds() {
        let mut app = app_with_bracket();
        assert!(matches!(app.new_bracket(), StorageRequest::Save(None)));
        assert!(app.state.bracket.snapshot.is_none());
        assert_eq!(app.state.active_tab, MenuItem::SeedEntry);
        assert_eq!(app.state.seeds.filled(), 14);
        assert!(app.export_request().is_none());
    }

    #[test]
    fn loaded_bracket_fills_seed_grid() {
        let mut app = App::new();
        let snapshot = bracket::initialize(seeds_2025()).unwrap();
        app.on_loaded(Some(snapshot));
        assert_eq!(app.state.active_tab, MenuItem::Bracket);
        assert_eq!(app.state.seeds.filled(), 14);
    }
}
