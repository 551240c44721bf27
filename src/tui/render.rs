use ratatui::layout::Alignment;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::models::View;
use crate::tui::app::{Focus, Mode};
use crate::tui::router::{self, Pane};
use crate::tui::views;
use crate::tui::widgets::{
    help::render_help, notice::render_notice, status_bar::render_status_bar, tabs::render_tabs,
    transaction_form::render_transaction_form,
};
use crate::tui::{App, Layout};
use crate::utils::format_key_binding_for_display as key;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let palette = app.palette();

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Dayboard")
        .title_alignment(Alignment::Center)
        .style(palette.base());
    f.render_widget(outer_block, f.area());

    let view = app.active_view();
    render_tabs(f, layout.tabs_area, view, &palette);

    match router::pane_for(view) {
        Pane::Home => views::home::render(f, layout.main_area, app, &palette),
        Pane::Agenda => views::agenda::render(f, layout.main_area, app, &palette),
        Pane::Completion => views::completion::render(f, layout.main_area, app, &palette),
        Pane::Highlights => views::highlights::render(f, layout.main_area, app, &palette),
        Pane::Personal => views::journal::render(f, layout.main_area, app, &palette),
        Pane::Finance => views::finances::render(f, layout.main_area, app, &palette),
        Pane::Settings => views::settings::render(f, layout.main_area, app, &palette),
    }

    if router::shows_sidebar(view) && layout.sidebar_area.width > 0 {
        views::priority::render(f, layout.sidebar_area, app, &palette);
    }

    // Overlays go on top of the normal content
    match app.ui.mode {
        Mode::Help => render_help(f, f.area(), &app.config.key_bindings, &palette),
        Mode::TransactionForm => {
            if let Some(form) = app.form.as_mut() {
                render_transaction_form(f, f.area(), form, &palette);
            }
        }
        Mode::ReceiptPrompt => views::finances::render_receipt_prompt(f, f.area(), app, &palette),
        Mode::Browse | Mode::EditText => {}
    }
    if let Some(notice) = &app.notice {
        render_notice(f, f.area(), notice, &palette);
    }

    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, app.status.message.as_ref(), &key_hints, &palette);
}

fn get_key_hints(app: &App) -> Vec<String> {
    let b = &app.config.key_bindings;
    if app.notice.is_some() {
        return vec!["Enter/Esc: Dismiss".to_string()];
    }
    match app.ui.mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", key(&b.help))],
        Mode::EditText => {
            let enter = match app.edit.as_ref() {
                Some(edit) if edit.target.is_multi_line() => "Enter: New line",
                _ => "Enter: Done",
            };
            vec![
                enter.to_string(),
                format!("Esc or {}: Done", key(&b.save)),
                format!("{}: Undo", key("Ctrl+z")),
            ]
        }
        Mode::TransactionForm => vec![
            "Tab/Shift+Tab: Next/previous field".to_string(),
            "←/→: Change choice".to_string(),
            format!("{}: Save", key(&b.save)),
            "Esc: Cancel".to_string(),
        ],
        Mode::ReceiptPrompt => vec!["Enter: Scan".to_string(), "Esc: Cancel".to_string()],
        Mode::Browse => {
            let mut hints = vec![format!("{}: Quit", key(&b.quit))];
            if app.ui.focus == Focus::Sidebar {
                hints.push(format!("{}: Unstar", key(&b.toggle_priority)));
                hints.push(format!("{}: Back to view", key(&b.focus_sidebar)));
            } else {
                match app.active_view() {
                    View::Home => hints.push(format!("{}: Regenerate", key(&b.regenerate))),
                    View::Agenda => hints.push(format!("{}: Star", key(&b.toggle_priority))),
                    View::Completion => {
                        hints.push(format!("{}: Completed", key(&b.toggle_completed)));
                        hints.push(format!("{}: Unachieved", key(&b.toggle_unachieved)));
                        hints.push(format!("{}: Reason", key(&b.edit)));
                        hints.push(format!("{}: Reschedule", key(&b.reschedule)));
                    }
                    View::Highlights => {
                        hints.push(format!("{}: Edit", key(&b.edit)));
                        hints.push(format!("{}: Attach proof", key(&b.attach_proof)));
                    }
                    View::Personal => {
                        hints.push(format!("{}: Mood", key(&b.cycle_mood)));
                        hints.push(format!("{}: Write", key(&b.edit)));
                    }
                    View::Finance => {
                        hints.push(format!("{}: New", key(&b.new)));
                        hints.push(format!("{}: Scan receipt", key(&b.scan_receipt)));
                    }
                    View::Settings => hints.push(format!("{}: Apply theme", key(&b.select))),
                }
                if router::shows_sidebar(app.active_view()) {
                    hints.push(format!("{}: Priorities", key(&b.focus_sidebar)));
                }
            }
            if App::control_for_view(app.active_view()).is_some() && app.active_view() != View::Home {
                hints.push(format!("{}: AI", key(&b.generate)));
            }
            hints.push(format!("{}: Help", key(&b.help)));
            hints
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Gateway;
    use crate::Config;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;
    use std::path::PathBuf;

    fn screen(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let layout = Layout::calculate(
                    Rect::new(0, 0, width, height),
                    app.config.sidebar_width_percent,
                    router::shows_sidebar(app.active_view()),
                );
                render(f, app, &layout);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn app() -> App {
        App::new(Config::default(), PathBuf::from("/tmp/dayboard-test/config.toml"), Gateway::disabled())
    }

    #[test]
    fn every_view_renders() {
        let mut app = app();
        for view in View::ALL {
            app.set_view(view);
            let text = screen(&mut app, 120, 40);
            assert!(text.contains("Dayboard"), "{:?}", view);
        }
    }

    #[test]
    fn home_shows_greeting_and_cards() {
        let mut app = app();
        let text = screen(&mut app, 120, 40);
        assert!(text.contains("Welcome Back!"));
        assert!(text.contains("Total Tasks"));
        assert!(text.contains("AI Daily Briefing"));
    }

    #[test]
    fn sidebar_shows_on_agenda_only_with_excerpt_off_personal() {
        let mut app = app();
        app.set_view(View::Agenda);
        let agenda = screen(&mut app, 120, 40);
        assert!(agenda.contains("Priority Tasks"));
        assert!(agenda.contains("Personal Journal"));

        app.set_view(View::Personal);
        let personal = screen(&mut app, 120, 40);
        assert!(personal.contains("Priority Tasks"));
        assert!(!personal.contains("Personal Journal"));

        app.set_view(View::Finance);
        let finance = screen(&mut app, 120, 40);
        assert!(!finance.contains("Priority Tasks"));
        assert!(finance.contains("Net Balance"));
    }

    #[test]
    fn overlays_render() {
        let mut app = app();
        app.set_view(View::Finance);
        app.open_transaction_form();
        assert!(screen(&mut app, 120, 40).contains("Add Transaction"));
        app.show_notice("Invalid Transaction", "Description is required");
        assert!(screen(&mut app, 120, 40).contains("Description is required"));
    }

    #[test]
    fn small_terminal_does_not_panic() {
        let mut app = app();
        app.set_view(View::Completion);
        screen(&mut app, 40, 12);
    }
}
