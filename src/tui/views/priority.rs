use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::progress::priority_tasks;
use crate::tui::app::Focus;
use crate::tui::router;
use crate::tui::views::list_block;
use crate::tui::widgets::color::Palette;
use crate::tui::App;

pub const EMPTY_HINT: &str = "Mark any task with a star to see it here.";

pub fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let with_excerpt = router::shows_journal_excerpt(app.active_view());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if with_excerpt {
            [Constraint::Percentage(60), Constraint::Percentage(40)]
        } else {
            [Constraint::Percentage(100), Constraint::Length(0)]
        })
        .split(area);

    let tasks = app.store.tasks();
    let priorities = priority_tasks(&tasks);
    let focused = app.ui.focus == Focus::Sidebar;

    if priorities.is_empty() {
        let empty = Paragraph::new(Line::styled(EMPTY_HINT, palette.muted()))
            .wrap(Wrap { trim: true })
            .block(list_block("Priority Tasks", focused, palette));
        f.render_widget(empty, rows[0]);
    } else {
        let items: Vec<ListItem> = priorities
            .iter()
            .map(|task| {
                ListItem::new(Line::from(vec![
                    Span::styled("★ ", palette.title()),
                    Span::raw(task.title.clone()),
                    Span::styled(format!("  {}", task.time), palette.muted()),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(list_block("Priority Tasks", focused, palette))
            .highlight_style(palette.selected())
            .style(palette.base());
        let mut state = ListState::default();
        if focused {
            state.select(Some(app.ui.sidebar_index.min(priorities.len() - 1)));
        }
        f.render_stateful_widget(list, rows[0], &mut state);
    }

    if with_excerpt {
        let mood = app.store.mood();
        let text = app.store.journal_text();
        let lines = vec![
            Line::from(format!("{} {}", mood.symbol(), mood.label())),
            Line::styled(
                if text.trim().is_empty() { "No notes yet.".to_string() } else { text.to_string() },
                palette.muted(),
            ),
        ];
        let excerpt = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(list_block("Personal Journal", false, palette));
        f.render_widget(excerpt, rows[1]);
    }
}
