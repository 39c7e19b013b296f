use bracket_engine::RoundKind;
use tui::style::{Color, Modifier, Style};

pub const FRAME_COUNT: usize = 4;
pub const BALL_HEIGHT: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerColor {
    Primary,
    Secondary,
    Accent,
    Shadow,
    Winner,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BannerTheme {
    #[default]
    Dark,
}

pub fn resolve(color: BannerColor, _theme: BannerTheme) -> Style {
    match color {
        BannerColor::Primary => Style::default().fg(Color::Rgb(1, 51, 105)),
        BannerColor::Secondary => Style::default().fg(Color::Rgb(213, 10, 10)),
        BannerColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        BannerColor::Shadow => Style::default().fg(Color::Indexed(240)),
        BannerColor::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    }
}

/// Row of the bouncing highlight, a triangle wave over `height` rows.
pub fn ball_row(tick: u64, height: u16) -> u16 {
    let h = u64::from(height.saturating_sub(1));
    if h == 0 {
        return 0;
    }
    let t = tick % (2 * h);
    h.abs_diff(t) as u16
}

/// A football turning end over end.
pub fn football_frame(frame: usize) -> [&'static str; BALL_HEIGHT as usize] {
    const FRAMES: [[&str; BALL_HEIGHT as usize]; FRAME_COUNT] = [
        ["  .----.  ", " /  ++  \\ ", "(  ++++  )", " \\  ++  / ", "  '----'  "],
        ["   .--.   ", "  / ++ \\  ", " ( ++++ ) ", "  \\ ++ /  ", "   '--'   "],
        ["    ..    ", "   /++\\   ", "  ( ++ )  ", "   \\++/   ", "    ''    "],
        ["   .--.   ", "  / ++ \\  ", " ( ++++ ) ", "  \\ ++ /  ", "   '--'   "],
    ];
    FRAMES[frame % FRAME_COUNT]
}

pub fn title_rows() -> [&'static str; 4] {
    [
        " _  _  ___  _        ___  _       _   __   __  ___   ___  ___  ___ ",
        "| \\| || __|| |      | _ \\| |     /_\\  \\ \\ / / / _ \\ | __|| __|/ __|",
        "| .` || _| | |__    |  _/| |__  / _ \\  \\ V / | (_) || _| | _| \\__ \\",
        "|_|\\_||_|  |____|   |_|  |____|/_/ \\_\\  |_|   \\___/ |_|  |_|  |___/",
    ]
}

pub fn round_label(round: RoundKind) -> &'static str {
    match round {
        RoundKind::WildCard => "WILD CARD",
        RoundKind::Divisional => "DIVISIONAL",
        RoundKind::ConferenceFinal => "CONFERENCE CHAMPIONSHIP",
        RoundKind::Championship => "SUPER BOWL",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ball_row_bounces_between_edges() {
        let rows: Vec<u16> = (0..10).map(|t| ball_row(t, BALL_HEIGHT)).collect();
        assert_eq!(rows, vec![4, 3, 2, 1, 0, 1, 2, 3, 4, 3]);
        assert_eq!(ball_row(7, 1), 0);
        assert_eq!(ball_row(7, 0), 0);
    }

    #[test]
    fn frames_share_one_width() {
        for frame in 0..FRAME_COUNT {
            for row in football_frame(frame) {
                assert_eq!(row.chars().count(), 10);
            }
        }
        let title = title_rows();
        assert!(title.iter().all(|r| r.chars().count() == title[0].chars().count()));
    }
}
