use crate::components::banner_frames::{
    BALL_HEIGHT, BannerColor, BannerTheme, ball_row, football_frame, resolve, round_label, title_rows,
};
use bracket_engine::RoundKind;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

pub use crate::components::banner_frames::FRAME_COUNT;

pub struct AnimatedBanner {
    pub frame: usize,
    pub tick: u64,
    pub theme: BannerTheme,
    /// Furthest round with a matchup in the current bracket.
    pub round: Option<RoundKind>,
    pub champion: Option<String>,
}

impl Default for AnimatedBanner {
    fn default() -> Self {
        Self {
            frame: 0,
            tick: 0,
            theme: BannerTheme::Dark,
            round: None,
            champion: None,
        }
    }
}

impl AnimatedBanner {
    fn subtitle(&self) -> String {
        match (&self.champion, self.round) {
            (Some(name), _) => format!("CHAMPIONS: {}", name.to_uppercase()),
            (None, Some(round)) => format!("BRACKET IN PROGRESS  |  {}", round_label(round)),
            (None, None) => "WILD CARD  ->  SUPER BOWL".to_string(),
        }
    }

    fn subtitle_style(&self) -> Style {
        if self.champion.is_some() {
            resolve(BannerColor::Winner, self.theme)
        } else {
            resolve(BannerColor::Accent, self.theme)
        }
    }
}

impl Widget for AnimatedBanner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 3 {
            render_line(Line::from(" NFL PLAYOFFS "), area.x, area.y, area.width, buf);
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(resolve(BannerColor::Secondary, self.theme));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if inner.width < 90 {
            render_compact(&self, inner, buf);
            return;
        }
        render_full(&self, inner, buf);
    }
}

fn render_compact(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    render_centered(
        Line::from(Span::styled("NFL PLAYOFFS", resolve(BannerColor::Accent, banner.theme))),
        inner,
        inner.y,
        buf,
    );
    if inner.height > 1 {
        render_centered(
            Line::from(Span::styled(banner.subtitle(), banner.subtitle_style())),
            inner,
            inner.y + 1,
            buf,
        );
    }
}

fn render_full(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    let title = title_rows();
    let left_ball = football_frame(banner.frame);
    let right_ball = football_frame((banner.frame + 2) % FRAME_COUNT);
    let lit_row = ball_row(banner.tick, BALL_HEIGHT);
    let show_right_ball = inner.width > 100;
    let blank = " ".repeat(title[0].chars().count());

    for row in 0..BALL_HEIGHT {
        if row >= inner.height {
            break;
        }
        let ball_style = if row == lit_row {
            resolve(BannerColor::Secondary, banner.theme)
        } else {
            resolve(BannerColor::Shadow, banner.theme)
        };
        let text = title.get(row as usize).copied().unwrap_or(blank.as_str());

        let mut spans = vec![
            Span::styled(left_ball[row as usize], ball_style),
            Span::raw(" "),
            Span::styled(text, resolve(BannerColor::Primary, banner.theme)),
        ];
        if show_right_ball {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(right_ball[row as usize], ball_style));
        }
        render_centered(Line::from(spans), inner, inner.y + row, buf);
    }

    if inner.height > BALL_HEIGHT {
        render_centered(
            Line::from(Span::styled(format!(" {} ", banner.subtitle()), banner.subtitle_style())),
            inner,
            inner.y + BALL_HEIGHT,
            buf,
        );
    }
}

fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = line.width() as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    render_line(line, x, y, area.width, buf);
}

fn render_line(line: Line, x: u16, y: u16, max_width: u16, buf: &mut Buffer) {
    let mut cx = x;
    let limit = x.saturating_add(max_width);
    for span in &line.spans {
        let run: String = span
            .content
            .chars()
            .take(usize::from(limit.saturating_sub(cx)))
            .collect();
        if run.is_empty() {
            break;
        }
        let len = run.chars().count() as u16;
        buf.set_string(cx, y, run, span.style);
        cx += len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn compact_banner_shows_champion() {
        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);
        AnimatedBanner {
            champion: Some("Seattle Seahawks".to_string()),
            ..AnimatedBanner::default()
        }
        .render(area, &mut buf);

        assert!(row_text(&buf, 1).contains("NFL PLAYOFFS"));
        assert!(row_text(&buf, 2).contains("CHAMPIONS: SEATTLE SEAHAWKS"));
    }

    #[test]
    fn full_banner_draws_title_and_round() {
        let area = Rect::new(0, 0, 110, 8);
        let mut buf = Buffer::empty(area);
        AnimatedBanner {
            round: Some(RoundKind::Divisional),
            ..AnimatedBanner::default()
        }
        .render(area, &mut buf);

        assert!(row_text(&buf, 3).contains("|  _/| |__"));
        assert!(row_text(&buf, 6).contains("DIVISIONAL"));
    }

    #[test]
    fn tiny_area_falls_back_to_plain_title() {
        let area = Rect::new(0, 0, 16, 1);
        let mut buf = Buffer::empty(area);
        AnimatedBanner::default().render(area, &mut buf);
        assert_eq!(row_text(&buf, 0), " NFL PLAYOFFS   ");
    }
}
