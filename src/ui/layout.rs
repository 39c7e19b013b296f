use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_HEIGHT: u16 = 1;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub status: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool) {
        *self = Self::from_rect(area, full_screen);
    }

    fn from_rect(area: Rect, full_screen: bool) -> Self {
        if full_screen {
            let [main, status] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(STATUS_HEIGHT)]).areas(area);
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                main,
                status,
            };
        }

        let [tab, main, status] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .areas(area);

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            main,
            status,
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(80), Constraint::Percentage(20)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_drops_tab_bar() {
        let mut areas = LayoutAreas::new(Size::new(120, 40));
        assert_eq!(areas.main.y, TAB_BAR_HEIGHT);
        assert_eq!(areas.status.y, 39);

        areas.update(Rect::new(0, 0, 120, 40), true);
        assert_eq!(areas.tab_bar[0], Rect::ZERO);
        assert_eq!(areas.main.height, 39);
    }
}
