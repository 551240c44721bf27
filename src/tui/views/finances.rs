use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::ai::Control;
use crate::finance::{format_amount, newest_first, summarize};
use crate::models::TransactionKind;
use crate::tui::views::{insight_state, list_block, render_stat_card};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::help::popup_area;
use crate::tui::widgets::insight::render_insight;
use crate::tui::widgets::text_input::render_text_input;
use crate::tui::App;

pub fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Percentage(30),
        ])
        .split(area);

    let transactions = app.store.transactions();
    let summary = summarize(&transactions);
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[0]);
    let income = Style::default().fg(palette.income);
    let expense = Style::default().fg(palette.expense);
    render_stat_card(f, cards[0], "Income Today", &format!("${:.2}", summary.total_income), income, palette);
    render_stat_card(f, cards[1], "Expenses Today", &format!("${:.2}", summary.total_expenses), expense, palette);
    let net_style = if summary.net_balance >= 0.0 { income } else { expense };
    render_stat_card(f, cards[2], "Net Balance", &format!("${:.2}", summary.net_balance), net_style, palette);

    let ordered = newest_first(&transactions);
    if ordered.is_empty() {
        let empty = Paragraph::new(Line::styled("No transactions recorded today.", palette.muted()))
            .block(list_block("Transactions", true, palette));
        f.render_widget(empty, rows[1]);
    } else {
        let items: Vec<ListItem> = ordered
            .iter()
            .map(|t| {
                let amount_style = match t.kind {
                    TransactionKind::Income => income,
                    TransactionKind::Expense => expense,
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{}  ", t.date), palette.muted()),
                    Span::raw(t.description.clone()),
                    Span::styled(format!("  ({})  ", t.category.label()), palette.muted()),
                    Span::styled(format_amount(t), amount_style),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(list_block("Transactions", true, palette))
            .highlight_style(palette.selected())
            .style(palette.base());
        let mut state = ListState::default();
        state.select(Some(app.ui.finance_index.min(ordered.len() - 1)));
        f.render_stateful_widget(list, rows[1], &mut state);
    }

    let state = insight_state(app, Control::SpendingInsight, "get a spending insight");
    render_insight(f, rows[2], "AI Spending Insight", &state, palette);
}

pub fn render_receipt_prompt(f: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let popup_area = popup_area(area, 60, 30);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Scan Receipt")
        .title_alignment(Alignment::Center)
        .title_style(palette.title())
        .style(palette.base());
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);
    render_text_input(
        f,
        rows[0],
        "Image path",
        &mut app.receipt_path,
        true,
        "~/Pictures/receipt.jpg",
        palette,
    );
    let hint = Paragraph::new(vec![
        Line::styled("png, jpg, jpeg, webp, heic or heif", palette.muted()),
        Line::styled("Enter: Scan • Esc: Cancel", palette.muted()),
    ]);
    f.render_widget(hint, rows[1]);
}
