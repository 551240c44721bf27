use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, size as terminal_size};
use log::info;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use std::time::Duration;

use crate::models::View;
use crate::tui::app::{FormField, Focus, Mode};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::{router, App};
use crate::utils::{has_primary_modifier, parse_key_binding, ParsedKeyBinding};

/// Guard that ensures terminal state is restored even on panic.
/// If the terminal is left in raw mode or the alternate screen, the user's
/// shell is unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; the guard does nothing on drop afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already cleaning up, errors have nowhere to go
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check the size before entering the alternate screen so the error is
    // printed in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;

    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::TerminalTooSmall {
            width,
            height,
            min_width: min_width_with_border,
            min_height: min_height_with_border,
        });
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    info!("terminal ready ({}x{})", width, height);

    loop {
        app.tick();

        let terminal_size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, terminal_size.width, terminal_size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(
                terminal_rect,
                app.config.sidebar_width_percent,
                router::shows_sidebar(app.active_view()),
            );
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        // Only Press events, so Windows doesn't see every key twice
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    info!("terminal restored");

    Ok(())
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    // Ctrl on Windows/Linux, Ctrl or Option on macOS
    if binding.requires_ctrl != has_primary_modifier(key_event.modifiers) {
        return false;
    }
    binding.key_code == key_event.code
}

/// True when `key_event` is the configured `binding`
fn pressed(key_event: KeyEvent, binding: &str) -> Result<bool, TuiError> {
    let parsed = parse_key_binding(binding).map_err(TuiError::KeyBindingError)?;
    Ok(matches_key_event(key_event, &parsed))
}

/// Route one key press. Returns true when the user asked to quit.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if app.notice.is_some() {
        if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_notice();
        }
        return Ok(false);
    }

    match app.ui.mode {
        Mode::Help => handle_help(app, key_event),
        Mode::EditText => handle_text_edit(app, key_event),
        Mode::TransactionForm => handle_transaction_form(app, key_event),
        Mode::ReceiptPrompt => handle_receipt_prompt(app, key_event),
        Mode::Browse => handle_browse(app, key_event),
    }
}

fn handle_help(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Esc || pressed(key_event, &app.config.key_bindings.help)? {
        app.ui.mode = Mode::Browse;
    }
    Ok(false)
}

fn handle_text_edit(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Esc || pressed(key_event, &app.config.key_bindings.save)? {
        app.finish_edit();
        return Ok(false);
    }
    let Some(edit) = app.edit.as_mut() else {
        app.ui.mode = Mode::Browse;
        return Ok(false);
    };
    if key_event.code == KeyCode::Enter {
        if edit.target.is_multi_line() {
            edit.editor.insert_newline();
            app.sync_edit();
        } else {
            app.finish_edit();
        }
        return Ok(false);
    }
    if edit.editor.handle_key(key_event) {
        app.sync_edit();
    }
    Ok(false)
}

fn handle_transaction_form(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Esc {
        app.close_transaction_form();
        return Ok(false);
    }
    if pressed(key_event, &app.config.key_bindings.save)? {
        app.submit_transaction_form();
        return Ok(false);
    }
    let Some(form) = app.form.as_mut() else {
        app.ui.mode = Mode::Browse;
        return Ok(false);
    };
    match key_event.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.previous_field(),
        KeyCode::Enter => {
            if form.current_field == FormField::Date {
                app.submit_transaction_form();
            } else {
                form.next_field();
            }
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if form.current_field == FormField::Kind => {
            form.draft.toggle_kind();
        }
        KeyCode::Left if form.current_field == FormField::Category => form.draft.cycle_category(false),
        KeyCode::Right | KeyCode::Char(' ') if form.current_field == FormField::Category => {
            form.draft.cycle_category(true);
        }
        _ => {
            if let Some(editor) = form.current_editor() {
                editor.handle_key(key_event);
            }
        }
    }
    Ok(false)
}

fn handle_receipt_prompt(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Esc => app.close_receipt_prompt(),
        KeyCode::Enter => app.submit_receipt_prompt(),
        _ => {
            app.receipt_path.handle_key(key_event);
        }
    }
    Ok(false)
}

fn handle_browse(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let bindings = app.config.key_bindings.clone();

    if pressed(key_event, &bindings.quit)? {
        return Ok(true);
    }
    if pressed(key_event, &bindings.help)? {
        app.ui.mode = Mode::Help;
        return Ok(false);
    }
    for (index, shortcut) in bindings.view_shortcuts().iter().enumerate() {
        if pressed(key_event, shortcut)? {
            app.set_view(View::from_index(index));
            return Ok(false);
        }
    }
    if pressed(key_event, &bindings.tab_left)? {
        app.set_view(app.active_view().previous());
        return Ok(false);
    }
    if pressed(key_event, &bindings.tab_right)? {
        app.set_view(app.active_view().next());
        return Ok(false);
    }
    if pressed(key_event, &bindings.focus_sidebar)? {
        app.toggle_focus();
        return Ok(false);
    }
    if key_event.code == KeyCode::Up || pressed(key_event, &bindings.list_up)? {
        app.move_selection_up();
        return Ok(false);
    }
    if key_event.code == KeyCode::Down || pressed(key_event, &bindings.list_down)? {
        app.move_selection_down();
        return Ok(false);
    }
    if pressed(key_event, &bindings.copy_insight)? {
        app.copy_insight();
        return Ok(false);
    }
    if pressed(key_event, &bindings.regenerate)? || pressed(key_event, &bindings.generate)? {
        app.request_insight();
        return Ok(false);
    }

    if app.ui.focus == Focus::Sidebar {
        if pressed(key_event, &bindings.toggle_priority)? || pressed(key_event, &bindings.select)? {
            app.toggle_priority_selected();
        } else if pressed(key_event, &bindings.edit)? {
            app.begin_edit();
        } else if pressed(key_event, &bindings.cycle_mood)? {
            app.cycle_mood();
        }
        return Ok(false);
    }

    match app.active_view() {
        View::Settings => {
            if pressed(key_event, &bindings.select)? {
                app.apply_selected_theme();
            }
        }
        View::Agenda => {
            if pressed(key_event, &bindings.toggle_priority)? || pressed(key_event, &bindings.select)? {
                app.toggle_priority_selected();
            }
        }
        View::Completion => {
            if pressed(key_event, &bindings.toggle_completed)? || pressed(key_event, &bindings.select)? {
                app.toggle_completed_selected();
            } else if pressed(key_event, &bindings.toggle_unachieved)? {
                app.toggle_unachieved_selected();
            } else if pressed(key_event, &bindings.edit)? {
                app.begin_edit();
            } else if pressed(key_event, &bindings.reschedule)? {
                app.notify_reschedule();
            }
        }
        View::Highlights => {
            if pressed(key_event, &bindings.edit)? || pressed(key_event, &bindings.select)? {
                app.begin_edit();
            } else if pressed(key_event, &bindings.attach_proof)? {
                app.notify_attach_proof();
            }
        }
        View::Personal => {
            if pressed(key_event, &bindings.edit)? || pressed(key_event, &bindings.select)? {
                app.begin_edit();
            } else if pressed(key_event, &bindings.cycle_mood)? {
                app.cycle_mood();
            }
        }
        View::Finance => {
            if pressed(key_event, &bindings.new)? {
                app.open_transaction_form();
            } else if pressed(key_event, &bindings.scan_receipt)? {
                app.open_receipt_prompt();
            }
        }
        View::Home => {}
    }
    Ok(false)
}
