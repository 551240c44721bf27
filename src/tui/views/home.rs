use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::ai::Control;
use crate::progress::day_counts;
use crate::tui::views::{insight_state, render_stat_card};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::insight::render_insight;
use crate::tui::App;
use crate::utils::{format_long_date, parse_date};

pub fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Greeting
            Constraint::Length(4), // Stat cards
            Constraint::Min(3),    // Briefing
        ])
        .split(area);

    let date = parse_date(&app.today)
        .map(format_long_date)
        .unwrap_or_else(|_| app.today.clone());
    let greeting = vec![
        Line::styled("Welcome Back!", palette.title().add_modifier(Modifier::UNDERLINED)),
        Line::from(format!("Here's your dashboard for {}", date)),
    ];
    f.render_widget(Paragraph::new(greeting).style(palette.base()), rows[0]);

    let counts = day_counts(&app.store.tasks());
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[1]);
    let value_style = palette.title();
    render_stat_card(f, cards[0], "Total Tasks", &counts.total.to_string(), value_style, palette);
    render_stat_card(f, cards[1], "Upcoming", &counts.pending.to_string(), value_style, palette);
    render_stat_card(f, cards[2], "Completed", &counts.completed.to_string(), value_style, palette);
    let mood = app.store.mood();
    render_stat_card(
        f,
        cards[3],
        "Current Mood",
        &format!("{} {}", mood.symbol(), mood.label()),
        value_style,
        palette,
    );

    let state = insight_state(app, Control::DailyBriefing, "refresh your briefing");
    render_insight(f, rows[2], "AI Daily Briefing", &state, palette);
}
