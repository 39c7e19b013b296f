use crate::app::MenuItem;
use crate::state::storage::LoadingState;
use bracket_engine::teams::{self, NflTeam};
use bracket_engine::{CONFERENCE_SIZE, Conference, Entrant, Matchup, RoundKind, Snapshot};

/// Undo depth. Older snapshots are dropped first.
const HISTORY_LIMIT: usize = 64;

// ---------------------------------------------------------------------------
// Banner animation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnimationState {
    /// Current frame index into the banner frames array, wraps at FRAME_COUNT.
    pub frame: usize,
    /// Monotonic tick counter, drives color cycling.
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self, frame_count: usize) {
        self.tick = self.tick.wrapping_add(1);
        self.frame = (self.frame + 1) % frame_count;
    }
}

// ---------------------------------------------------------------------------
// Seed entry state
// ---------------------------------------------------------------------------

fn conference_index(conference: Conference) -> usize {
    match conference {
        Conference::Afc => 0,
        Conference::Nfc => 1,
    }
}

#[derive(Debug)]
pub struct SeedEntryState {
    pub conference: Conference,
    /// Selected seed row, 0 is the 1 seed.
    pub selected_seed: usize,
    slots: [[Option<&'static NflTeam>; CONFERENCE_SIZE]; 2],
}

impl Default for SeedEntryState {
    fn default() -> Self {
        Self {
            conference: Conference::Afc,
            selected_seed: 0,
            slots: [[None; CONFERENCE_SIZE]; 2],
        }
    }
}

impl SeedEntryState {
    pub fn slots(&self, conference: Conference) -> &[Option<&'static NflTeam>; CONFERENCE_SIZE] {
        &self.slots[conference_index(conference)]
    }

    pub fn navigate_down(&mut self) {
        if self.selected_seed + 1 < CONFERENCE_SIZE {
            self.selected_seed += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected_seed = self.selected_seed.saturating_sub(1);
    }

    pub fn switch_conference(&mut self) {
        self.conference = self.conference.other();
    }

    /// Step the selected slot through the conference's clubs, skipping clubs
    /// already seeded elsewhere in the conference.
    pub fn cycle_team(&mut self, forward: bool) {
        let conference = self.conference;
        let seed = self.selected_seed;
        let slots = &self.slots[conference_index(conference)];
        let taken: Vec<&str> = slots
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != seed)
            .filter_map(|(_, t)| t.map(|t| t.id))
            .collect();
        let candidates: Vec<&'static NflTeam> = teams::teams_in(conference)
            .into_iter()
            .filter(|t| !taken.contains(&t.id))
            .collect();
        if candidates.is_empty() {
            return;
        }

        let current = slots[seed].and_then(|t| candidates.iter().position(|c| c.id == t.id));
        let len = candidates.len();
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.slots[conference_index(conference)][seed] = Some(candidates[next]);
    }

    pub fn clear_selected(&mut self) {
        self.slots[conference_index(self.conference)][self.selected_seed] = None;
    }

    pub fn load_2025(&mut self) {
        for conference in Conference::ALL {
            let ids = teams::seed_ids_2025(conference);
            for (slot, id) in self.slots[conference_index(conference)].iter_mut().zip(ids) {
                *slot = teams::find_team(id);
            }
        }
    }

    /// Mirror the seeding of a loaded bracket so "new bracket" starts from it.
    pub fn fill_from(&mut self, entrants: &[Entrant]) {
        self.slots = [[None; CONFERENCE_SIZE]; 2];
        for entrant in entrants {
            let seed = usize::from(entrant.seed);
            if !(1..=CONFERENCE_SIZE).contains(&seed) {
                continue;
            }
            let team = teams::NFL_TEAMS.iter().find(|t| t.name == entrant.name);
            self.slots[conference_index(entrant.conference)][seed - 1] = team;
        }
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().flatten().filter(|t| t.is_some()).count()
    }

    /// The 14 entrants, or a message naming the first empty slot.
    pub fn entrants(&self) -> Result<Vec<Entrant>, String> {
        let mut entrants = Vec::with_capacity(CONFERENCE_SIZE * 2);
        for conference in Conference::ALL {
            for (seed, slot) in (1u8..).zip(self.slots(conference)) {
                let team = slot.ok_or_else(|| format!("{conference} seed {seed} is empty"))?;
                entrants.push(teams::entrant_for(team, seed));
            }
        }
        Ok(entrants)
    }
}

// ---------------------------------------------------------------------------
// Bracket state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BracketState {
    pub snapshot: Option<Snapshot>,
    /// Previous snapshots, newest last.
    history: Vec<Snapshot>,
    /// The round the user has navigated to.
    pub view_round: RoundKind,
    pub conference: Conference,
    /// Selected game index within the current conference + round.
    pub selected_game: usize,
}

impl BracketState {
    /// Replace the bracket wholesale. Undo history does not survive.
    pub fn load(&mut self, snapshot: Snapshot) {
        self.history.clear();
        self.snapshot = Some(snapshot);
        self.view_round = RoundKind::WildCard;
        self.conference = Conference::Afc;
        self.selected_game = 0;
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.snapshot = None;
        self.view_round = RoundKind::WildCard;
        self.selected_game = 0;
    }

    /// Move to `next`, keeping the current snapshot for undo.
    pub fn apply(&mut self, next: Snapshot) {
        if let Some(prev) = self.snapshot.replace(next) {
            self.history.push(prev);
            if self.history.len() > HISTORY_LIMIT {
                self.history.remove(0);
            }
        }
        self.clamp_selection();
    }

    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.history.pop() else {
            return false;
        };
        self.snapshot = Some(prev);
        self.clamp_selection();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn navigate_round_next(&mut self) {
        if let Some(next) = self.view_round.next() {
            self.view_round = next;
            self.selected_game = 0;
        }
    }

    pub fn navigate_round_prev(&mut self) {
        if let Some(prev) = self.view_round.prev() {
            self.view_round = prev;
            self.selected_game = 0;
        }
    }

    pub fn navigate_game_down(&mut self) {
        let max = self.games_in_view().saturating_sub(1);
        if self.selected_game < max {
            self.selected_game += 1;
        }
    }

    pub fn navigate_game_up(&mut self) {
        self.selected_game = self.selected_game.saturating_sub(1);
    }

    pub fn cycle_conference(&mut self) {
        if self.view_round.is_conference_round() {
            self.conference = self.conference.other();
            self.selected_game = 0;
        }
    }

    pub fn selected_matchup(&self) -> Option<&Matchup> {
        let snapshot = self.snapshot.as_ref()?;
        snapshot
            .matchups_in(self.conference, self.view_round)
            .get(self.selected_game)
            .copied()
    }

    fn games_in_view(&self) -> usize {
        self.snapshot
            .as_ref()
            .map(|s| s.matchups_in(self.conference, self.view_round).len())
            .unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        let max = self.games_in_view().saturating_sub(1);
        self.selected_game = self.selected_game.min(max);
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_intro: bool,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub last_info: Option<String>,
    pub loading: LoadingState,
    pub seeds: SeedEntryState,
    pub bracket: BracketState,
    pub animation: AnimationState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            show_intro: true,
            ..Self::default()
        }
    }
}
