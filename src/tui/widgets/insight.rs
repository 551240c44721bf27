use ratatui::layout::Rect;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use ratskin::RatSkin;
use termimad::minimad::Text as MinimadText;

use crate::tui::widgets::color::Palette;

/// What an AI panel currently has to show
#[derive(Debug, Clone, PartialEq)]
pub enum InsightState<'a> {
    Loading(&'a str),
    Ready(&'a str),
    Idle(String),
    Disabled(&'a str),
}

/// Render generated text as markdown, wrapped to `width`
pub fn markdown_lines(text: &str, width: u16) -> Vec<Line<'static>> {
    let parsed = RatSkin::default().parse(MinimadText::from(text), width);
    parsed
        .into_iter()
        .map(|line| {
            let spans: Vec<Span<'static>> = line
                .spans
                .into_iter()
                .map(|span| Span::styled(span.content.to_string(), span.style))
                .collect();
            Line::from(spans)
        })
        .collect()
}

pub fn render_insight(f: &mut Frame, area: Rect, title: &str, state: &InsightState, palette: &Palette) {
    if area.width < 3 || area.height < 3 {
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(palette.title())
        .style(palette.base());
    let inner = block.inner(area);

    let text = match state {
        InsightState::Ready(body) => Text::from(markdown_lines(body, inner.width)),
        InsightState::Loading(message) => Text::from(Line::styled(message.to_string(), palette.title())),
        InsightState::Idle(hint) => Text::from(Line::styled(hint.clone(), palette.muted())),
        InsightState::Disabled(reason) => Text::from(Line::styled(reason.to_string(), palette.muted())),
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(palette.base())
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn markdown_keeps_words() {
        let lines = markdown_lines("Focus on **the release** today.", 60);
        let text = plain(&lines);
        assert!(text.contains("the release"));
        assert!(!text.contains("**"));
    }

    #[test]
    fn markdown_wraps_to_width() {
        let lines = markdown_lines("one two three four five six seven eight nine ten", 12);
        assert!(lines.len() > 1);
    }
}
