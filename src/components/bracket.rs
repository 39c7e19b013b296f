use bracket_engine::{Conference, Entrant, Matchup, RoundKind, Snapshot, rounds};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::banner_frames::{BannerColor, BannerTheme, resolve};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per game cell: home line, status line, away line.
pub const GAME_HEIGHT: u16 = 3;

/// Slot heights for each bracket depth (d=0 = Wild Card leaf, d=2 = conference final root).
/// Formula: SH[0] = GAME_HEIGHT; SH[d] = 2 * SH[d-1] + 1.
const SH: [u16; 3] = [
    GAME_HEIGHT,                     // Wild Card:  3
    2 * GAME_HEIGHT + 1,             // Divisional: 7
    2 * (2 * GAME_HEIGHT + 1) + 1,   // Conference: 15
];

/// Total terminal rows consumed by one conference bracket.
pub const CONFERENCE_HEIGHT: u16 = SH[2];

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Maximum game cell width in wider terminals.
pub const CELL_W_FULL: u16 = 22;

/// Leaf slots per conference: the bye plus three Wild Card games.
const LEAF_SLOTS: usize = 4;

const ROUNDS: [RoundKind; 3] = [RoundKind::WildCard, RoundKind::Divisional, RoundKind::ConferenceFinal];

// ---------------------------------------------------------------------------
// GameCell
// ---------------------------------------------------------------------------

/// Pre-computed layout position for one slot within a conference grid.
#[derive(Debug, Clone)]
pub struct GameCell {
    /// Row of the status line, the middle of the 3-row cell. Origin-relative.
    pub center_row: u16,
    /// Starting x-column for this cell within the grid (origin-relative).
    pub col: u16,
    pub cell_width: u16,
    pub round: RoundKind,
    /// Slot within the round. Wild Card slot 0 is the bye.
    pub slot: usize,
}

// ---------------------------------------------------------------------------
// ConferenceGrid
// ---------------------------------------------------------------------------

/// Bracket layout for one conference (Wild Card, Divisional, conference final).
///
/// Divisional games are reseeded, so the connectors show the shape of the
/// rounds rather than which Wild Card winner lands where.
#[derive(Debug, Clone)]
pub struct ConferenceGrid {
    /// Depth-major: Wild Card(4) + Divisional(2) + conference final(1).
    pub cells: Vec<GameCell>,
    /// Starting x-column per depth.
    pub round_cols: [u16; 3],
    pub total_width: u16,
    pub cell_width: u16,
    /// Wild Card on the right, conference final on the left.
    pub mirrored: bool,
}

impl ConferenceGrid {
    /// Center rows follow `center[d][i] = SH[d]/2 + i * (SH[d+1] - SH[d])`:
    ///   Wild Card  (d=0): [1, 5, 9, 13]
    ///   Divisional (d=1): [3, 11]
    ///   Conference (d=2): [7]
    pub fn compute(terminal_width: u16) -> Self {
        Self::compute_inner(terminal_width, false)
    }

    /// For the NFC pane, which points left toward the championship.
    pub fn compute_mirrored(terminal_width: u16) -> Self {
        Self::compute_inner(terminal_width, true)
    }

    fn compute_inner(terminal_width: u16, mirrored: bool) -> Self {
        let per_col = terminal_width.saturating_sub(CONNECTOR_WIDTH * 2) / 3;
        let cell_width = per_col.clamp(1, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;
        let round_cols = if mirrored {
            [stride * 2, stride, 0]
        } else {
            [0, stride, stride * 2]
        };

        let first_center = [SH[0] / 2, SH[1] / 2, SH[2] / 2];
        let spacing = [SH[1] - SH[0], SH[2] - SH[1], 0];
        let slot_counts = [LEAF_SLOTS, 2, 1];

        let mut cells = Vec::with_capacity(7);
        for (d, round) in ROUNDS.into_iter().enumerate() {
            for slot in 0..slot_counts[d] {
                cells.push(GameCell {
                    center_row: first_center[d] + slot as u16 * spacing[d],
                    col: round_cols[d],
                    cell_width,
                    round,
                    slot,
                });
            }
        }

        Self {
            cells,
            round_cols,
            total_width: stride * 2 + cell_width,
            cell_width,
            mirrored,
        }
    }

    pub fn cells_for_depth(&self, depth: usize) -> &[GameCell] {
        const OFFSETS: [usize; 4] = [0, 4, 6, 7];
        &self.cells[OFFSETS[depth]..OFFSETS[depth + 1]]
    }
}

// ---------------------------------------------------------------------------
// ConferenceView widget
// ---------------------------------------------------------------------------

/// What one cell shows.
enum CellContent<'a> {
    Empty,
    Bye(&'a Entrant),
    Game(&'a Matchup),
}

/// Renders one conference: the bye, the Wild Card games and the rounds they feed.
pub struct ConferenceView<'a> {
    pub snapshot: &'a Snapshot,
    pub conference: Conference,
    pub grid: &'a ConferenceGrid,
    /// Highlighted round and game index within that round.
    pub selected: Option<(RoundKind, usize)>,
    pub theme: BannerTheme,
}

impl<'a> ConferenceView<'a> {
    fn content(&self, cell: &GameCell) -> CellContent<'a> {
        let snapshot: &'a Snapshot = self.snapshot;
        if cell.round == RoundKind::WildCard && cell.slot == 0 {
            return rounds::bye_entrant(&snapshot.entrants, self.conference)
                .map_or(CellContent::Empty, CellContent::Bye);
        }
        let index = game_index(cell);
        snapshot
            .matchups_in(self.conference, cell.round)
            .get(index)
            .copied()
            .map_or(CellContent::Empty, CellContent::Game)
    }

    fn is_selected(&self, cell: &GameCell) -> bool {
        let is_bye = cell.round == RoundKind::WildCard && cell.slot == 0;
        !is_bye && self.selected == Some((cell.round, game_index(cell)))
    }
}

impl Widget for ConferenceView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < GAME_HEIGHT {
            return;
        }

        // Pass 1: cells
        for cell in &self.grid.cells {
            draw_game_cell(&self.content(cell), cell, self.is_selected(cell), area, self.theme, buf);
        }

        // Pass 2: connectors, each parent joined to its two children
        for depth in 0..2usize {
            let child_cells = self.grid.cells_for_depth(depth);
            let parent_cells = self.grid.cells_for_depth(depth + 1);
            let conn_x_base = if self.grid.mirrored {
                area.x + self.grid.round_cols[depth].saturating_sub(CONNECTOR_WIDTH)
            } else {
                area.x + self.grid.round_cols[depth] + self.grid.cell_width
            };

            for (j, parent) in parent_cells.iter().enumerate() {
                draw_connector(
                    child_cells[2 * j].center_row,
                    parent.center_row,
                    child_cells[2 * j + 1].center_row,
                    conn_x_base,
                    area,
                    self.theme,
                    self.grid.mirrored,
                    buf,
                );
            }
        }
    }
}

/// Index into `Snapshot::matchups_in` for a cell. The bye shifts Wild Card games by one.
fn game_index(cell: &GameCell) -> usize {
    match cell.round {
        RoundKind::WildCard => cell.slot.saturating_sub(1),
        _ => cell.slot,
    }
}

// ---------------------------------------------------------------------------
// ChampionshipView widget
// ---------------------------------------------------------------------------

/// The championship game between the two panes, with the champion beneath it.
pub struct ChampionshipView<'a> {
    pub matchup: Option<&'a Matchup>,
    pub selected: bool,
    pub theme: BannerTheme,
}

impl Widget for ChampionshipView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < GAME_HEIGHT + 2 || area.width < 8 {
            return;
        }
        let accent = resolve(BannerColor::Accent, self.theme);

        let title = "SUPER BOWL";
        let tx = area.x + area.width.saturating_sub(title.len() as u16) / 2;
        let center_row = CONFERENCE_HEIGHT / 2;
        let title_y = area.y + center_row.saturating_sub(3).min(area.height - GAME_HEIGHT - 1);
        buf.set_string(tx, title_y, title, accent);

        let cell_width = area.width.min(CELL_W_FULL);
        let cell = GameCell {
            center_row: title_y - area.y + 2,
            col: area.width.saturating_sub(cell_width) / 2,
            cell_width,
            round: RoundKind::Championship,
            slot: 0,
        };
        let content = self.matchup.map_or(CellContent::Empty, CellContent::Game);
        draw_game_cell(&content, &cell, self.selected, area, self.theme, buf);

        if let Some(champion) = self.matchup.and_then(Matchup::winner) {
            let line = format!("* {} *", champion.name);
            let text: String = line.chars().take(usize::from(area.width)).collect();
            let x = area.x + area.width.saturating_sub(text.chars().count() as u16) / 2;
            let y = area.y + cell.center_row + 3;
            if y < area.y + area.height {
                buf.set_string(x, y, &text, resolve(BannerColor::Winner, self.theme));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Shared drawing helpers
// ---------------------------------------------------------------------------

/// Convert a grid row to an absolute screen y. `None` when clipped.
fn screen_y(row: u16, area: Rect) -> Option<u16> {
    (row < area.height).then_some(area.y + row)
}

/// Draw one cell (3 rows) into the buffer, clipped to `area`.
fn draw_game_cell(
    content: &CellContent,
    cell: &GameCell,
    selected: bool,
    area: Rect,
    theme: BannerTheme,
    buf: &mut Buffer,
) {
    let winner_style = resolve(BannerColor::Winner, theme).add_modifier(Modifier::BOLD);
    let shadow = resolve(BannerColor::Shadow, theme);

    let x = area.x + cell.col;
    if x >= area.x + area.width {
        return;
    }
    let avail_w = usize::from((area.x + area.width).saturating_sub(x));
    let width = usize::from(cell.cell_width);

    let base_style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let top_row = cell.center_row.saturating_sub(1);
    let bot_row = cell.center_row.saturating_add(1);

    for (row, line_idx) in [(top_row, 0u8), (cell.center_row, 1), (bot_row, 2)] {
        let Some(sy) = screen_y(row, area) else {
            continue;
        };

        let (text, style) = match (content, line_idx) {
            (CellContent::Empty, 1) => (pad("  TBD", width), shadow),
            (CellContent::Empty, _) => (" ".repeat(width), shadow),
            (CellContent::Bye(entrant), 0) => (format_team_line(Some(*entrant), width), base_style),
            (CellContent::Bye(_), 1) => (pad("   bye", width), shadow),
            (CellContent::Bye(_), _) => (" ".repeat(width), shadow),
            (CellContent::Game(m), 1) => (format_status_line(m, selected, width), shadow),
            (CellContent::Game(m), _) => {
                let entrant = if line_idx == 0 { &m.home } else { &m.away };
                let style = if m.winner_id.as_deref() == Some(entrant.id.as_str()) {
                    winner_style
                } else if m.is_decided() {
                    shadow
                } else {
                    base_style
                };
                (format_team_line(Some(entrant), width), style)
            }
        };

        let clipped: String = text.chars().take(avail_w).collect();
        buf.set_string(x, sy, &clipped, style);
    }
}

fn pad(text: &str, width: usize) -> String {
    let clipped: String = text.chars().take(width).collect();
    format!("{clipped:<width$}")
}

/// `"[seed] [name]"` padded to `width`. Falls back to the abbreviation when
/// the full name does not fit.
pub fn format_team_line(entrant: Option<&Entrant>, width: usize) -> String {
    let Some(entrant) = entrant else {
        return pad("   TBD", width);
    };
    let name_w = width.saturating_sub(3);
    let name = if entrant.name.chars().count() <= name_w {
        entrant.name.as_str()
    } else {
        entrant.short_label()
    };
    pad(&format!("{:2} {name}", entrant.seed), width)
}

/// Middle row of a game cell: the pick, or a hint on the selected game.
fn format_status_line(matchup: &Matchup, selected: bool, width: usize) -> String {
    let raw = match matchup.winner() {
        Some(winner) => format!("   -> {}", winner.short_label()),
        None if selected => "   [ home  ] away".to_string(),
        None => "   vs".to_string(),
    };
    pad(&raw, width)
}

/// Draw box-drawing connectors between one parent and its two children.
///
/// ```text
///  child_top  ──┐
///               │
///  parent     ──├──
///               │
///  child_bot  ──┘
/// ```
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_base_x: u16,
    area: Rect,
    theme: BannerTheme,
    mirrored: bool,
    buf: &mut Buffer,
) {
    let style = resolve(BannerColor::Shadow, theme);
    let col_a = conn_base_x;
    let col_b = conn_base_x + 1;
    let col_c = conn_base_x + 2;
    let limit_x = area.x + area.width;

    let mut put = |x: u16, row: u16, ch: char| {
        if x < limit_x
            && let Some(sy) = screen_y(row, area)
        {
            put_char(buf, x, sy, ch, style);
        }
    };

    if mirrored {
        put(col_b, r_top, '┌');
        put(col_c, r_top, '─');
        for row in (r_top + 1)..r_mid {
            put(col_b, row, '│');
        }
        put(col_a, r_mid, '─');
        put(col_b, r_mid, '┤');
        for row in (r_mid + 1)..r_bot {
            put(col_b, row, '│');
        }
        put(col_b, r_bot, '└');
        put(col_c, r_bot, '─');
    } else {
        put(col_a, r_top, '─');
        put(col_b, r_top, '┐');
        for row in (r_top + 1)..r_mid {
            put(col_b, row, '│');
        }
        put(col_a, r_mid, '─');
        put(col_b, r_mid, '├');
        put(col_c, r_mid, '─');
        for row in (r_mid + 1)..r_bot {
            put(col_b, row, '│');
        }
        put(col_a, r_bot, '─');
        put(col_b, r_bot, '┘');
    }
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_engine::{bracket, teams};

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn seeded() -> Snapshot {
        bracket::initialize(teams::seeds_2025()).unwrap()
    }

    #[test]
    fn test_slot_heights() {
        assert_eq!(SH, [3, 7, 15]);
        assert_eq!(CONFERENCE_HEIGHT, 15);
    }

    #[test]
    fn test_round_centers() {
        let grid = ConferenceGrid::compute(80);
        assert_eq!(grid.cells.len(), 7);
        let centers = |d: usize| grid.cells_for_depth(d).iter().map(|c| c.center_row).collect::<Vec<_>>();
        assert_eq!(centers(0), vec![1, 5, 9, 13]);
        assert_eq!(centers(1), vec![3, 11]);
        assert_eq!(centers(2), vec![7]);
    }

    #[test]
    fn test_parent_center_is_midpoint_of_children() {
        let grid = ConferenceGrid::compute(80);
        for depth in 0..2usize {
            let children = grid.cells_for_depth(depth);
            for (j, parent) in grid.cells_for_depth(depth + 1).iter().enumerate() {
                let expected = (children[2 * j].center_row + children[2 * j + 1].center_row) / 2;
                assert_eq!(parent.center_row, expected, "depth={depth} parent={j}");
            }
        }
    }

    #[test]
    fn test_cell_width_from_available_width() {
        let grid = ConferenceGrid::compute(60);
        assert_eq!(grid.cell_width, (60 - CONNECTOR_WIDTH * 2) / 3);
        assert_eq!(ConferenceGrid::compute(200).cell_width, CELL_W_FULL);
    }

    #[test]
    fn test_mirrored_puts_wild_card_on_the_right() {
        let grid = ConferenceGrid::compute_mirrored(80);
        assert_eq!(grid.round_cols[2], 0);
        assert!(grid.round_cols[0] > grid.round_cols[1]);
    }

    #[test]
    fn test_format_team_line_width() {
        let entrants = teams::seeds_2025();
        let line = format_team_line(Some(&entrants[0]), 22);
        assert_eq!(line.chars().count(), 22);
        assert_eq!(line, " 1 Denver Broncos     ");
        let short = format_team_line(Some(&entrants[0]), 10);
        assert_eq!(short, " 1 DEN    ");
        assert_eq!(format_team_line(None, 8).chars().count(), 8);
    }

    #[test]
    fn test_conference_view_shows_bye_and_wild_card() {
        let snapshot = seeded();
        let grid = ConferenceGrid::compute(80);
        let area = Rect::new(0, 0, 80, CONFERENCE_HEIGHT);
        let mut buf = Buffer::empty(area);
        ConferenceView {
            snapshot: &snapshot,
            conference: Conference::Afc,
            grid: &grid,
            selected: Some((RoundKind::WildCard, 0)),
            theme: BannerTheme::Dark,
        }
        .render(area, &mut buf);

        assert!(row_text(&buf, 0).starts_with(" 1 Denver Broncos"));
        assert!(row_text(&buf, 1).contains("bye"));
        // first wild card game is 2 v 7, one slot below the bye; the long name is abbreviated
        assert!(row_text(&buf, 4).starts_with(" 2 NE "));
        assert!(row_text(&buf, 5).contains("[ home  ] away"));
        assert!(row_text(&buf, 6).starts_with(" 7 "));
        // divisional round not generated yet
        assert!(row_text(&buf, 3).contains("TBD"));
        assert!(row_text(&buf, 3).contains('├'));
    }

    #[test]
    fn test_winner_is_marked_on_status_line() {
        let snapshot = seeded();
        let home = snapshot.matchups[0].home.id.clone();
        let snapshot = bracket::record_winner(&snapshot, "wc-AFC-1", &home).unwrap();
        let grid = ConferenceGrid::compute(80);
        let area = Rect::new(0, 0, 80, CONFERENCE_HEIGHT);
        let mut buf = Buffer::empty(area);
        ConferenceView {
            snapshot: &snapshot,
            conference: Conference::Afc,
            grid: &grid,
            selected: None,
            theme: BannerTheme::Dark,
        }
        .render(area, &mut buf);

        assert!(row_text(&buf, 5).contains("-> NE"));
        assert_eq!(buf[(1, 4)].style().fg, resolve(BannerColor::Winner, BannerTheme::Dark).fg);
    }

    #[test]
    fn test_championship_view_names_champion() {
        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(7);
        let snapshot = bracket::randomize_picks(&seeded(), &mut rng).unwrap();
        let champion = snapshot.champion().unwrap().name.clone();

        let area = Rect::new(0, 0, 30, CONFERENCE_HEIGHT);
        let mut buf = Buffer::empty(area);
        ChampionshipView {
            matchup: snapshot.championship(),
            selected: false,
            theme: BannerTheme::Dark,
        }
        .render(area, &mut buf);

        let rows: Vec<String> = (0..CONFERENCE_HEIGHT).map(|y| row_text(&buf, y)).collect();
        assert!(rows.iter().any(|r| r.contains("SUPER BOWL")));
        assert!(rows.iter().any(|r| r.contains(&format!("* {champion} *"))));
    }
}
