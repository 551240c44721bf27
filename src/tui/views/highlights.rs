use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::ai::Control;
use crate::tui::app::{EditTarget, Focus};
use crate::tui::views::{insight_state, list_block};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::insight::render_insight;
use crate::tui::widgets::text_input::render_text_input;
use crate::tui::App;

pub fn render(f: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let achievements = app.store.achievements();
    let editing = matches!(app.edit.as_ref().map(|e| &e.target), Some(EditTarget::Achievement(_)));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(if editing { 3 } else { 0 }),
            Constraint::Percentage(40),
        ])
        .split(area);

    let focused = app.ui.focus == Focus::Main;
    if achievements.is_empty() {
        let empty = Paragraph::new(Line::styled("No highlights yet.", palette.muted()))
            .block(list_block("Today's Highlights", focused, palette));
        f.render_widget(empty, rows[0]);
    } else {
        let items: Vec<ListItem> = achievements
            .iter()
            .enumerate()
            .map(|(i, achievement)| {
                let text = if achievement.text.trim().is_empty() {
                    Span::styled(format!("Achievement #{}", i + 1), palette.muted())
                } else {
                    Span::raw(achievement.text.clone())
                };
                let proof = if achievement.proof.is_some() { "  📎" } else { "" };
                ListItem::new(Line::from(vec![
                    Span::styled("🏆 ", palette.title()),
                    text,
                    Span::raw(proof),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(list_block("Today's Highlights", focused, palette))
            .highlight_style(palette.selected())
            .style(palette.base());
        let mut state = ListState::default();
        if focused {
            state.select(Some(app.ui.highlight_index.min(achievements.len() - 1)));
        }
        f.render_stateful_widget(list, rows[0], &mut state);
    }

    if editing {
        let placeholder = format!("Achievement #{}", app.ui.highlight_index + 1);
        if let Some(edit) = app.edit.as_mut() {
            render_text_input(f, rows[1], "Edit Highlight", &mut edit.editor, true, &placeholder, palette);
        }
    }

    let state = insight_state(app, Control::AchievementInsight, "generate an AI insight");
    render_insight(f, rows[2], "AI Insight", &state, palette);
}
