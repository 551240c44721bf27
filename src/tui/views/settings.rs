use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::config::ThemePreference;
use crate::tui::views::list_block;
use crate::tui::widgets::color::Palette;
use crate::tui::App;

pub fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(ThemePreference::ALL.len() as u16 + 3),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(area);

    let items: Vec<ListItem> = ThemePreference::ALL
        .iter()
        .map(|theme| {
            let marker = if *theme == app.config.theme { "(•)" } else { "( )" };
            let suffix = match theme {
                ThemePreference::System => format!("  follows terminal, now {}", app.config.effective_theme().label()),
                _ => String::new(),
            };
            ListItem::new(format!("{} {}{}", marker, theme.label(), suffix))
        })
        .collect();
    let list = List::new(items)
        .block(list_block("Appearance - Theme:", true, palette))
        .highlight_style(palette.selected())
        .style(palette.base());
    let mut state = ListState::default();
    state.select(Some(app.ui.settings_index.min(ThemePreference::ALL.len() - 1)));
    f.render_stateful_widget(list, rows[0], &mut state);

    let ai_status = if app.dispatcher.gateway().is_enabled() {
        format!("AI assist enabled ({})", app.config.ai.model)
    } else {
        format!("AI assist disabled: set {} or ai.api_key in the config", app.config.ai.api_key_env)
    };
    let ai = Paragraph::new(vec![Line::from(ai_status)])
        .wrap(Wrap { trim: true })
        .block(list_block("AI", false, palette));
    f.render_widget(ai, rows[1]);

    let log_path = app
        .log_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "not logging".to_string());
    let account = Paragraph::new(vec![
        Line::styled("Profile and notification settings will be available here soon.", palette.muted()),
        Line::from(""),
        Line::from(format!("Config: {}", app.config_path.display())),
        Line::from(format!("Log:    {}", log_path)),
    ])
    .wrap(Wrap { trim: true })
    .block(list_block("Account", false, palette));
    f.render_widget(account, rows[2]);
}
