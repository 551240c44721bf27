use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::ai::Control;
use crate::models::TaskStatus;
use crate::progress::completion_rate;
use crate::tui::app::{EditTarget, Focus};
use crate::tui::views::{insight_state, list_block};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::insight::render_insight;
use crate::tui::widgets::text_input::render_text_input;
use crate::tui::App;

pub const REASON_PLACEHOLDER: &str = "Reason for not completing (optional)";

pub fn render(f: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let tasks = app.store.tasks();
    let editing_reason = matches!(app.edit.as_ref().map(|e| &e.target), Some(EditTarget::Reason(_)));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(if editing_reason { 3 } else { 0 }),
            Constraint::Percentage(35),
        ])
        .split(area);

    let rate = completion_rate(&tasks);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Completion Tracker").title_style(palette.title()))
        .gauge_style(ratatui::style::Style::default().fg(palette.accent).bg(palette.bg))
        .percent(rate as u16)
        .label(format!("{}% Complete", rate));
    f.render_widget(gauge, rows[0]);

    let focused = app.ui.focus == Focus::Main;
    if tasks.is_empty() {
        let empty = Paragraph::new(Line::styled("No tasks to track today.", palette.muted()))
            .block(list_block("Tasks", focused, palette));
        f.render_widget(empty, rows[1]);
    } else {
        let items: Vec<ListItem> = tasks
            .iter()
            .map(|task| {
                let (mark, title_style) = match task.status {
                    TaskStatus::Completed => ("[✓]", palette.muted().add_modifier(Modifier::CROSSED_OUT)),
                    TaskStatus::Unachieved => ("[✗]", palette.base().fg(palette.expense)),
                    TaskStatus::Pending => ("[ ]", palette.base()),
                };
                let mut lines = vec![Line::from(vec![
                    Span::raw(format!("{} ", mark)),
                    Span::styled(task.title.clone(), title_style),
                    Span::styled(format!("  {}", task.time), palette.muted()),
                ])];
                if task.status == TaskStatus::Unachieved {
                    let reason = match task.reason.as_deref() {
                        Some(reason) if !reason.is_empty() => Line::raw(format!("    Reason: {}", reason)),
                        _ => Line::styled(format!("    {}", REASON_PLACEHOLDER), palette.muted()),
                    };
                    lines.push(reason);
                }
                ListItem::new(lines)
            })
            .collect();
        let list = List::new(items)
            .block(list_block("Tasks", focused, palette))
            .highlight_style(palette.selected())
            .style(palette.base());
        let mut state = ListState::default();
        if focused {
            state.select(Some(app.ui.completion_index.min(tasks.len() - 1)));
        }
        f.render_stateful_widget(list, rows[1], &mut state);
    }

    if editing_reason {
        if let Some(edit) = app.edit.as_mut() {
            render_text_input(f, rows[2], "Reason", &mut edit.editor, true, REASON_PLACEHOLDER, palette);
        }
    }

    let state = insight_state(app, Control::CompletionAnalysis, "get suggestions");
    render_insight(f, rows[3], "AI Improvement Suggestions", &state, palette);
}
