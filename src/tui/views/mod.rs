//! One module per dashboard view. Each exposes a `render` taking the area
//! the router assigned to it.

pub mod agenda;
pub mod completion;
pub mod finances;
pub mod highlights;
pub mod home;
pub mod journal;
pub mod priority;
pub mod settings;

use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::ai::Control;
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::insight::InsightState;
use crate::tui::App;
use crate::utils::format_key_binding_for_display;

/// Panel state for `control`. `action` names the button, e.g. "Generate AI Insight".
pub fn insight_state<'a>(app: &'a App, control: Control, action: &str) -> InsightState<'a> {
    if app.dispatcher.is_pending(control) {
        let message = match control {
            Control::DailyBriefing => "Generating your focus for today...",
            _ => "Generating...",
        };
        return InsightState::Loading(message);
    }
    if let Some(text) = app.insights.get(&control) {
        return InsightState::Ready(text);
    }
    if let Some(reason) = app.disabled_reason(control) {
        return InsightState::Disabled(reason);
    }
    InsightState::Idle(format!(
        "Press {} to {}",
        format_key_binding_for_display(&app.config.key_bindings.generate),
        action
    ))
}

/// Small bordered box with a label and a large value
pub fn render_stat_card(f: &mut Frame, area: Rect, label: &str, value: &str, value_style: Style, palette: &Palette) {
    let lines = vec![
        Line::styled(value.to_string(), value_style),
        Line::styled(label.to_string(), palette.muted()),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).style(palette.base()));
    f.render_widget(paragraph, area);
}

/// Block for a list, with a brighter border when it has focus
pub fn list_block<'a>(title: &'a str, focused: bool, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(palette.title())
        .border_style(palette.border(focused))
        .style(palette.base())
}
