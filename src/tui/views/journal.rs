use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::ai::Control;
use crate::models::Mood;
use crate::tui::app::EditTarget;
use crate::tui::views::{insight_state, list_block};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::insight::render_insight;
use crate::tui::widgets::text_input::render_text_input;
use crate::tui::App;

pub const NOTES_PLACEHOLDER: &str = "Reflect on your day, thoughts, and feelings...";

pub fn render(f: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Percentage(35),
        ])
        .split(area);

    let current = app.store.mood();
    let mut spans = Vec::new();
    for mood in Mood::ALL {
        let style = if mood == current { palette.selected() } else { palette.base() };
        spans.push(Span::styled(format!(" {} {} ", mood.symbol(), mood.label()), style));
        spans.push(Span::raw(" "));
    }
    let moods = Paragraph::new(Line::from(spans)).block(list_block("How are you feeling?", false, palette));
    f.render_widget(moods, rows[0]);

    let editing = matches!(app.edit.as_ref().map(|e| &e.target), Some(EditTarget::Journal));
    match app.edit.as_mut() {
        Some(edit) if editing => {
            render_text_input(f, rows[1], "Your Thoughts", &mut edit.editor, true, NOTES_PLACEHOLDER, palette);
        }
        _ => {
            let mut preview = Editor::from_string(app.store.journal_text());
            render_text_input(f, rows[1], "Your Thoughts", &mut preview, false, NOTES_PLACEHOLDER, palette);
        }
    }

    let state = insight_state(app, Control::ReflectionSummary, "summarize your reflection");
    render_insight(f, rows[2], "AI Reflection Summary", &state, palette);
}
