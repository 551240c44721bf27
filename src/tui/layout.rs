use ratatui::layout::{Rect, Layout as RatLayout, Direction, Constraint};

pub struct Layout {
    pub inner_area: Rect,  // Inside the outer border
    pub tabs_area: Rect,
    pub main_area: Rect,
    pub sidebar_area: Rect, // Right of the main pane; zero width when hidden
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application.
    /// Width: 38 columns (36 inner + 2 borders) fits a 25 column sidebar next
    /// to an 11 column main pane.
    /// Height: 10 lines (tabs, content, status and some room for cards).
    pub const MIN_WIDTH: u16 = 38;
    pub const MIN_HEIGHT: u16 = 10;

    pub fn calculate(size: Rect, sidebar_width_percent: u16, show_sidebar: bool) -> Self {
        let min_width_with_border = Self::MIN_WIDTH + 2;
        let min_height_with_border = Self::MIN_HEIGHT + 2;
        let width = size.width.max(min_width_with_border);
        let height = size.height.max(min_height_with_border);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Sidebar between 25 columns and 40%, leaving main at least 10
        let sidebar_width = if show_sidebar {
            let requested_width = (inner_area.width * sidebar_width_percent) / 100;
            let max_width = (inner_area.width * 40) / 100;
            requested_width
                .max(25)
                .min(max_width)
                .min(inner_area.width.saturating_sub(10))
        } else {
            0
        };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(sidebar_width),
            ])
            .split(vertical[1]);

        Self {
            inner_area,
            tabs_area: vertical[0],
            main_area: horizontal[0],
            sidebar_area: horizontal[1],
            status_area: vertical[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidebar_sits_right_of_main() {
        let layout = Layout::calculate(Rect::new(0, 0, 120, 40), 30, true);
        assert_eq!(layout.sidebar_area.width, 35);
        assert_eq!(layout.main_area.x + layout.main_area.width, layout.sidebar_area.x);
        assert_eq!(layout.tabs_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
    }

    #[test]
    fn hidden_sidebar_gives_main_full_width() {
        let layout = Layout::calculate(Rect::new(0, 0, 120, 40), 30, false);
        assert_eq!(layout.sidebar_area.width, 0);
        assert_eq!(layout.main_area.width, 118);
    }

    #[test]
    fn tiny_terminals_are_padded_to_minimum() {
        let layout = Layout::calculate(Rect::new(0, 0, 10, 5), 30, true);
        assert_eq!(layout.inner_area.width, Layout::MIN_WIDTH);
        assert!(layout.main_area.width >= 10);
    }
}
