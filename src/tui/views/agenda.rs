use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};
use ratatui::Frame;

use crate::progress::agenda_order;
use crate::tui::app::Focus;
use crate::tui::views::list_block;
use crate::tui::widgets::color::Palette;
use crate::tui::App;

pub fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let tasks = app.store.tasks();
    let ordered = agenda_order(&tasks);
    let focused = app.ui.focus == Focus::Main;

    let items: Vec<ListItem> = ordered
        .iter()
        .map(|task| {
            let star = if task.is_priority { "★" } else { "☆" };
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{} ", star), palette.title()),
                Span::raw(format!("{}  ", task.time)),
                Span::raw(task.title.clone()),
                Span::styled(
                    format!("  [{}] {}m", task.task_type.label(), task.duration),
                    palette.muted(),
                ),
            ])];
            if let Some(notes) = task.notes.as_deref().filter(|n| !n.is_empty()) {
                lines.push(Line::styled(format!("         {}", notes), palette.muted()));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(list_block("Today's Agenda", focused, palette))
        .highlight_style(palette.selected())
        .style(palette.base());

    let mut state = ListState::default();
    if !ordered.is_empty() && focused {
        state.select(Some(app.ui.agenda_index.min(ordered.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}
