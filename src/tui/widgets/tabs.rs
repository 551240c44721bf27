use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;
use ratatui::Frame;

use crate::models::View;
use crate::tui::widgets::color::{get_contrast_text_color, Palette};

pub fn render_tabs(f: &mut Frame, area: Rect, current_view: View, palette: &Palette) {
    // Contrast-aware text so unselected tabs stay readable on any tab_bg
    let tab_fg = get_contrast_text_color(palette.tab_bg);

    // Padded background spans make each tab look like a box
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| {
            Line::from(vec![
                Span::styled(" ", Style::default().bg(palette.tab_bg)),
                Span::styled(format!("{} {}", i + 1, view.title()), Style::default().fg(tab_fg).bg(palette.tab_bg)),
                Span::styled(" ", Style::default().bg(palette.tab_bg)),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(current_view.index())
        .style(palette.base())
        .highlight_style(palette.selected())
        .divider(" ")
        .padding("", "");

    f.render_widget(tabs, area);
}
