use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::models::Category;
use crate::tui::app::{FormField, TransactionForm};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::help::popup_area;
use crate::tui::widgets::text_input::render_text_input;

pub fn render_transaction_form(f: &mut Frame, area: Rect, form: &mut TransactionForm, palette: &Palette) {
    let popup_area = popup_area(area, 60, 80);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Add Transaction")
        .title_alignment(Alignment::Center)
        .title_style(palette.title())
        .style(palette.base());
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let current = form.current_field;
    let kind_label = form.kind().label();
    render_choice(f, rows[0], FormField::Kind.label(), kind_label, current == FormField::Kind, palette);
    render_text_input(
        f,
        rows[1],
        FormField::Description.label(),
        &mut form.description,
        current == FormField::Description,
        "e.g. Groceries",
        palette,
    );
    render_text_input(
        f,
        rows[2],
        FormField::Amount.label(),
        &mut form.amount,
        current == FormField::Amount,
        "0.00",
        palette,
    );
    let category = form.category();
    render_choice(
        f,
        rows[3],
        FormField::Category.label(),
        category.label(),
        current == FormField::Category,
        palette,
    );
    render_text_input(
        f,
        rows[4],
        FormField::Date.label(),
        &mut form.date,
        current == FormField::Date,
        "YYYY-MM-DD",
        palette,
    );

    let options = Category::for_kind(form.kind())
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ");
    let hints = vec![
        Line::styled(format!("Categories: {}", options), palette.muted()),
        Line::styled(
            "Tab/Shift+Tab: Move • ←/→ or Space: Change choice • Enter on Date or Ctrl+s: Save • Esc: Cancel",
            palette.muted(),
        ),
    ];
    f.render_widget(
        Paragraph::new(hints).wrap(ratatui::widgets::Wrap { trim: true }),
        rows[5],
    );
}

/// A field that cycles through fixed values
fn render_choice(f: &mut Frame, area: Rect, title: &str, value: &str, focused: bool, palette: &Palette) {
    let value_style = if focused { palette.selected() } else { palette.base() };
    let line = Line::from(vec![
        Span::styled("◀ ", palette.muted()),
        Span::styled(value.to_string(), value_style),
        Span::styled(" ▶", palette.muted()),
    ]);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(palette.border(focused))
            .style(palette.base()),
    );
    f.render_widget(paragraph, area);
}
