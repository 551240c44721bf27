use ratatui::layout::{Alignment, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::app::Notice;
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::help::popup_area;

pub fn render_notice(f: &mut Frame, area: Rect, notice: &Notice, palette: &Palette) {
    let popup_area = popup_area(area, 50, 30);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(""),
        Line::from(notice.message.as_str()),
        Line::from(""),
        Line::styled("Press Enter to continue", palette.muted()),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(notice.title.as_str())
                .title_alignment(Alignment::Center)
                .title_style(palette.title())
                .style(palette.base()),
        )
        .style(palette.base())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup_area);
}
