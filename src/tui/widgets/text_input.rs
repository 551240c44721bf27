use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::widgets::color::Palette;
use crate::tui::widgets::editor::Editor;

/// Bordered text box. When focused the editor's lines are shown unwrapped,
/// scrolled to keep the cursor visible, and the terminal cursor is placed.
/// Otherwise the text wraps, or the placeholder shows if it is blank.
pub fn render_text_input(
    f: &mut Frame,
    area: Rect,
    title: &str,
    editor: &mut Editor,
    focused: bool,
    placeholder: &str,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(palette.border(focused))
        .style(palette.base());
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if !focused {
        let paragraph = if editor.is_blank() {
            Paragraph::new(Line::styled(placeholder.to_string(), palette.muted()))
        } else {
            Paragraph::new(editor.to_string()).wrap(Wrap { trim: false })
        };
        f.render_widget(paragraph.style(palette.base()), inner);
        return;
    }

    let width = inner.width as usize;
    let height = inner.height as usize;
    editor.update_scroll(height);
    let h_offset = editor.cursor_col.saturating_sub(width.saturating_sub(1));
    let lines: Vec<Line> = editor
        .visible_lines(height)
        .iter()
        .map(|l| Line::from(l.chars().skip(h_offset).take(width).collect::<String>()))
        .collect();
    f.render_widget(Paragraph::new(lines).style(palette.base()), inner);

    if let Some((x, y)) = editor.cursor_screen_pos(inner) {
        f.set_cursor_position((x, y));
    }
}
