use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::config::KeyBindings;
use crate::tui::widgets::color::Palette;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, bindings: &KeyBindings, palette: &Palette) {
    let popup_area = popup_area(area, 60, 80);

    // Clear first so the view underneath doesn't show through
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(bindings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(palette.base()),
        )
        .style(palette.base())
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

/// Centered rect taking the given percentages of `area`
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

pub fn build_help_text(b: &KeyBindings) -> String {
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!("  {} / {}: Previous / next view\n", key(&b.tab_left), key(&b.tab_right)));
    text.push_str(&format!("  {} .. {}: Jump to view\n", key(&b.view_1), key(&b.view_7)));
    text.push_str(&format!("  {} / {}: Move selection up/down\n", key(&b.list_up), key(&b.list_down)));
    text.push_str(&format!("  {}: Switch between view and priority sidebar\n", key(&b.focus_sidebar)));
    text.push('\n');

    text.push_str("Tasks:\n");
    text.push_str(&format!("  {}: Star / unstar task (Agenda, sidebar)\n", key(&b.toggle_priority)));
    text.push_str(&format!("  {}: Toggle completed (Completion)\n", key(&b.toggle_completed)));
    text.push_str(&format!("  {}: Toggle unachieved (Completion)\n", key(&b.toggle_unachieved)));
    text.push_str(&format!("  {}: Reschedule (Completion)\n", key(&b.reschedule)));
    text.push_str(&format!("  {}: Edit reason, highlight or journal\n", key(&b.edit)));
    text.push_str(&format!("  {}: Attach proof (Highlights)\n", key(&b.attach_proof)));
    text.push_str(&format!("  {}: Change mood (Personal)\n", key(&b.cycle_mood)));
    text.push('\n');

    text.push_str("Finance:\n");
    text.push_str(&format!("  {}: New transaction\n", key(&b.new)));
    text.push_str(&format!("  {}: Scan a receipt image\n", key(&b.scan_receipt)));
    text.push('\n');

    text.push_str("AI:\n");
    text.push_str(&format!("  {}: Generate insight for this view\n", key(&b.generate)));
    text.push_str(&format!("  {}: Regenerate\n", key(&b.regenerate)));
    text.push_str(&format!("  {}: Copy insight to clipboard\n", key(&b.copy_insight)));
    text.push('\n');

    text.push_str("Editing:\n");
    text.push_str(&format!("  {} or Esc: Finish editing\n", key(&b.save)));
    text.push_str("  Enter: New line in the journal, finish elsewhere\n");
    text.push_str(&format!("  {}: Undo\n", key("Ctrl+z")));
    text.push_str("  Tab / Shift+Tab: Next / previous form field\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Apply setting (Settings)\n", key(&b.select)));
    text.push_str(&format!("  {}: Show/hide help\n", key(&b.help)));
    text.push_str(&format!("  {}: Quit\n", key(&b.quit)));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_configured_keys() {
        let mut bindings = KeyBindings::default();
        bindings.scan_receipt = "x".to_string();
        let text = build_help_text(&bindings);
        assert!(text.contains("x: Scan a receipt image"));
        assert!(text.contains("F1: Show/hide help"));
    }

    #[test]
    fn popup_is_centered() {
        let area = popup_area(Rect::new(0, 0, 100, 40), 50, 50);
        assert_eq!(area, Rect::new(25, 10, 50, 20));
    }
}
