use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::banner::AnimatedBanner;
use crate::components::banner_frames::BannerTheme;
use crate::components::bracket::{CONFERENCE_HEIGHT, ChampionshipView, ConferenceGrid, ConferenceView};
use crate::state::storage::ERROR_CHAR;
use crate::ui::layout::LayoutAreas;
use bracket_engine::{CONFERENCE_SIZE, Conference, RoundKind, Snapshot, teams};

static TABS: &[&str; 2] = &["Seeds", "Bracket"];

const CHAMPIONSHIP_WIDTH: u16 = 26;
/// Narrowest conference pane drawn side by side with the other.
const MIN_PANE_WIDTH: u16 = 50;
const LOG_HEIGHT: u16 = 10;

const HELP_TEXT: &str = "\
Global
  1 / 2        Seeds / Bracket tab
  ?  Esc       help / back
  i            import (NFLBRACKET_IMPORT or newest export)
  f            full screen
  \"            toggle log pane
  q  Ctrl-c    quit

Seeds
  j/k          move between seeds
  h/l  Tab     switch conference
  n/p          next / previous club
  Backspace    clear seed
  L            load 2025 playoff field
  Enter        generate bracket

Bracket
  h/l          previous / next round
  j/k          move between games
  c            switch conference
  [ / ]        pick home / away
  u            undo
  x            randomize all picks
  R            reset picks
  N            new bracket (back to seeds)
  e            export";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        if app.state.show_intro {
            draw_intro(f, f.area(), app);
            return;
        }

        layout.update(f.area(), app.settings.full_screen);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        let mut main = layout.main;
        if app.state.show_logs && main.height > LOG_HEIGHT * 2 {
            let [top, logs] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(LOG_HEIGHT)]).areas(main);
            main = top;
            draw_logs(f, logs);
        }

        match app.state.active_tab {
            MenuItem::SeedEntry => draw_seed_entry(f, main, app),
            MenuItem::Bracket => draw_bracket(f, main, app),
            MenuItem::Help => draw_help(f, main),
        }

        draw_status(f, layout.status, app);
        draw_loading_spinner(f, f.area(), app);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_intro(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" NFL Playoffs ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, banner_area, prompt_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let snapshot = app.state.bracket.snapshot.as_ref();
    f.render_widget(
        AnimatedBanner {
            frame: app.state.animation.frame,
            tick: app.state.animation.tick,
            theme: BannerTheme::Dark,
            round: snapshot.and_then(furthest_round),
            champion: snapshot.and_then(Snapshot::champion).map(|c| c.name.clone()),
        },
        banner_area,
    );
    let prompt = if snapshot.is_some() {
        "Press Enter to resume your bracket"
    } else {
        "Press Enter to seed the field"
    };
    f.render_widget(
        Paragraph::new(prompt)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt_area,
    );
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::SeedEntry => 0,
        MenuItem::Bracket => 1,
        MenuItem::Help => match app.state.previous_tab {
            MenuItem::Bracket => 1,
            _ => 0,
        },
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Seed entry
// ---------------------------------------------------------------------------

fn draw_seed_entry(f: &mut Frame, area: Rect, app: &App) {
    let seeds = &app.state.seeds;
    let block = default_border(Color::White).title(format!(
        " Seed the field ({}/{}) ",
        seeds.filled(),
        CONFERENCE_SIZE * 2
    ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [legend, content] = Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new("Keys: j/k=seed  h/l=conference  n/p=club  L=2025 field  Enter=generate")
            .style(Style::default().fg(Color::DarkGray)),
        legend,
    );

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(content);
    for (conference, pane) in [(Conference::Afc, left), (Conference::Nfc, right)] {
        let active = seeds.conference == conference;
        let pane_block = default_border(if active { Color::Yellow } else { Color::DarkGray })
            .title(format!(" {conference} "));
        let pane_inner = pane_block.inner(pane);
        f.render_widget(pane_block, pane);

        let lines: Vec<Line> = seeds
            .slots(conference)
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let selected = active && i == seeds.selected_seed;
                let marker = if selected { ">" } else { " " };
                let (name, detail) = match slot {
                    Some(team) => (team.name.to_string(), format!("{} {:?}", team.abbreviation, team.division)),
                    None => ("-".to_string(), String::new()),
                };
                let style = match (selected, slot.is_some()) {
                    (true, _) => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    (false, true) => Style::default().fg(Color::Gray),
                    (false, false) => Style::default().fg(Color::DarkGray),
                };
                let bye = if i == 0 { "  bye" } else { "" };
                Line::from(vec![
                    Span::styled(format!("{marker}{:2}  ", i + 1), style),
                    Span::styled(format!("{name:<24}"), style),
                    Span::styled(detail, Style::default().fg(Color::DarkGray)),
                    Span::styled(bye, Style::default().fg(Color::Yellow)),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(lines), pane_inner);
    }
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(snapshot) = app.state.bracket.snapshot.as_ref() else {
        f.render_widget(
            Paragraph::new("No bracket yet.\nSeed the field on tab 1 and press Enter, or press i to import.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let [header, key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    let view = &app.state.bracket;
    let focus = if view.view_round.is_conference_round() {
        format!("{} {}", view.conference, view.view_round.label())
    } else {
        view.view_round.label().to_string()
    };
    f.render_widget(
        Paragraph::new(format!("{}/{} picks | {focus}", snapshot.picks_made(), total_games())),
        header,
    );
    f.render_widget(
        Paragraph::new("Keys: h/l=round  j/k=game  c=conference  [/]=pick  u=undo  x=random  R=reset  e=export")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    let selected = Some((view.view_round, view.selected_game));
    let champ_selected = view.view_round == RoundKind::Championship;
    let pane_height = CONFERENCE_HEIGHT + 2;

    if content.width >= MIN_PANE_WIDTH * 2 + CHAMPIONSHIP_WIDTH {
        let [afc, champ, nfc] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(CHAMPIONSHIP_WIDTH),
            Constraint::Fill(1),
        ])
        .areas(content);
        for (conference, pane) in [(Conference::Afc, afc), (Conference::Nfc, nfc)] {
            let pane = Rect { height: pane.height.min(pane_height), ..pane };
            let focused = view.view_round.is_conference_round() && view.conference == conference;
            draw_conference_pane(f, pane, snapshot, conference, focused.then_some(selected).flatten());
        }
        let champ = Rect { height: champ.height.min(pane_height), ..champ };
        draw_championship(f, champ, snapshot, champ_selected);
        return;
    }

    // Narrow terminals: the focused conference over the championship.
    let [pane, champ] =
        Layout::vertical([Constraint::Length(pane_height), Constraint::Fill(1)]).areas(content);
    let focused = view.view_round.is_conference_round().then_some(selected).flatten();
    draw_conference_pane(f, pane, snapshot, view.conference, focused);
    draw_championship(f, champ, snapshot, champ_selected);
}

fn draw_conference_pane(
    f: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    conference: Conference,
    selected: Option<(RoundKind, usize)>,
) {
    let pane_block = default_border(if selected.is_some() { Color::Yellow } else { Color::DarkGray })
        .title(format!(" {conference} "));
    let inner = pane_block.inner(area);
    f.render_widget(pane_block, area);

    let grid = match conference {
        Conference::Afc => ConferenceGrid::compute(inner.width),
        Conference::Nfc => ConferenceGrid::compute_mirrored(inner.width),
    };
    // keep mirrored panes flush against the championship
    let x = match conference {
        Conference::Afc => inner.x,
        Conference::Nfc => inner.x + inner.width.saturating_sub(grid.total_width),
    };
    let grid_area = Rect { x, width: grid.total_width.min(inner.width), ..inner };
    f.render_widget(
        ConferenceView { snapshot, conference, grid: &grid, selected, theme: BannerTheme::Dark },
        grid_area,
    );
}

fn draw_championship(f: &mut Frame, area: Rect, snapshot: &Snapshot, selected: bool) {
    let block = default_border(if selected { Color::Yellow } else { Color::DarkGray });
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        ChampionshipView { matchup: snapshot.championship(), selected, theme: BannerTheme::Dark },
        inner,
    );
}

/// Games in a full bracket: both conferences' rounds plus the championship.
fn total_games() -> usize {
    RoundKind::ALL
        .iter()
        .map(|r| if r.is_conference_round() { r.games_per_conference() * 2 } else { 1 })
        .sum()
}

fn furthest_round(snapshot: &Snapshot) -> Option<RoundKind> {
    snapshot.matchups.iter().map(|m| m.round).max()
}

// ---------------------------------------------------------------------------
// Help, status, logs
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let catalog = format!(
        "\n\nClubs available: {} AFC, {} NFC",
        teams::teams_in(Conference::Afc).len(),
        teams::teams_in(Conference::Nfc).len()
    );
    f.render_widget(
        Paragraph::new(format!("{HELP_TEXT}{catalog}")).style(Style::default().fg(Color::Gray)),
        inner,
    );
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    let line = match (&app.state.last_error, &app.state.last_info) {
        (Some(err), _) => Line::from(Span::styled(format!(" ! {err}"), Style::default().fg(Color::Red))),
        (None, Some(info)) => Line::from(Span::styled(format!(" {info}"), Style::default().fg(Color::Gray))),
        (None, None) => Line::from(""),
    };
    let undo = if app.state.bracket.can_undo() { "u=undo " } else { "" };
    f.render_widget(Paragraph::new(line), area);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(undo, Style::default().fg(Color::DarkGray))))
            .alignment(Alignment::Right),
        area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(widget, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App) {
    let loading = app.state.loading;
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_engine::bracket;

    #[test]
    fn bracket_has_thirteen_games() {
        assert_eq!(total_games(), 13);
    }

    #[test]
    fn help_describes_randomize_as_overwriting() {
        assert!(HELP_TEXT.contains("randomize all picks"));
        assert!(!HELP_TEXT.contains("remaining"));
    }

    #[test]
    fn furthest_round_follows_generation() {
        let snapshot = bracket::initialize(teams::seeds_2025()).unwrap();
        assert_eq!(furthest_round(&snapshot), Some(RoundKind::WildCard));

        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(3);
        let done = bracket::randomize_picks(&snapshot, &mut rng).unwrap();
        assert_eq!(furthest_round(&done), Some(RoundKind::Championship));
    }
}
