use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{info, warn};

use crate::Config;
use crate::ai::{AiCompletion, AiDispatcher, AiJob, AiOutcome, AiResult, Control, Gateway, ReceiptImage, ReceiptScan};
use crate::config::ThemePreference;
use crate::finance::{self, TransactionDraft};
use crate::models::{Category, Task, TaskStatus, TaskUpdate, TransactionKind, View};
use crate::progress;
use crate::store::Store;
use crate::tui::router;
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::editor::Editor;
use crate::utils::{expand_path, get_current_date_string};

pub const COMING_SOON_RESCHEDULE: &str = "Reschedule feature coming soon!";
pub const COMING_SOON_PROOF: &str = "Attaching proof feature is coming soon!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Help,
    EditText,
    TransactionForm,
    ReceiptPrompt,
}

/// Which column receives list navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Main,
    Sidebar,
}

/// What an in-place text edit writes back to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Reason(String),
    Achievement(String),
    Journal,
}

impl EditTarget {
    pub fn is_multi_line(&self) -> bool {
        matches!(self, EditTarget::Journal)
    }
}

#[derive(Debug, Clone)]
pub struct TextEdit {
    pub target: EditTarget,
    pub editor: Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Kind,
    Description,
    Amount,
    Category,
    Date,
}

impl FormField {
    pub const ORDER: [FormField; 5] = [
        FormField::Kind,
        FormField::Description,
        FormField::Amount,
        FormField::Category,
        FormField::Date,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Kind => "Type",
            FormField::Description => "Description",
            FormField::Amount => "Amount",
            FormField::Category => "Category",
            FormField::Date => "Date",
        }
    }

    fn step(self, forward: bool) -> FormField {
        let index = FormField::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let len = FormField::ORDER.len();
        let next = if forward { (index + 1) % len } else { (index + len - 1) % len };
        FormField::ORDER[next]
    }
}

/// Manual transaction entry. Kind and category live in the draft, free text
/// lives in editors until submit.
#[derive(Debug, Clone)]
pub struct TransactionForm {
    pub draft: TransactionDraft,
    pub description: Editor,
    pub amount: Editor,
    pub date: Editor,
    pub current_field: FormField,
}

impl TransactionForm {
    pub fn new(today: &str) -> Self {
        Self {
            draft: TransactionDraft::new(today.to_string()),
            description: Editor::new(),
            amount: Editor::new(),
            date: Editor::from_string(today),
            current_field: FormField::Kind,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = self.current_field.step(true);
    }

    pub fn previous_field(&mut self) {
        self.current_field = self.current_field.step(false);
    }

    pub fn current_editor(&mut self) -> Option<&mut Editor> {
        match self.current_field {
            FormField::Description => Some(&mut self.description),
            FormField::Amount => Some(&mut self.amount),
            FormField::Date => Some(&mut self.date),
            FormField::Kind | FormField::Category => None,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.draft.kind
    }

    pub fn category(&self) -> Category {
        self.draft.category
    }

    /// The draft with the editors' current text
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            description: self.description.to_string(),
            amount: self.amount.to_string(),
            date: self.date.to_string(),
            ..self.draft.clone()
        }
    }
}

/// Blocking message, dismissed with Enter or Esc
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    pub focus: Focus,
    pub agenda_index: usize,
    pub completion_index: usize,
    pub highlight_index: usize,
    pub finance_index: usize,
    pub sidebar_index: usize,
    pub settings_index: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::Browse,
            focus: Focus::Main,
            agenda_index: 0,
            completion_index: 0,
            highlight_index: 0,
            finance_index: 0,
            sidebar_index: 0,
            settings_index: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    pub config: Config,
    pub config_path: PathBuf,
    pub store: Store,
    pub dispatcher: AiDispatcher,
    pub ui: UiState,
    pub status: StatusState,
    /// Latest generated (or fallback) text per control
    pub insights: HashMap<Control, String>,
    pub edit: Option<TextEdit>,
    pub form: Option<TransactionForm>,
    pub receipt_path: Editor,
    pub notice: Option<Notice>,
    pub today: String,
    pub log_path: Option<PathBuf>,
    last_briefed_revision: Option<u64>,
}

impl App {
    pub fn new(config: Config, config_path: PathBuf, gateway: Gateway) -> Self {
        Self::with_store(config, config_path, gateway, Store::seeded())
    }

    pub fn with_store(config: Config, config_path: PathBuf, gateway: Gateway, store: Store) -> Self {
        let settings_index = ThemePreference::ALL
            .iter()
            .position(|t| *t == config.theme)
            .unwrap_or(0);
        Self {
            config,
            config_path,
            store,
            dispatcher: AiDispatcher::new(gateway),
            ui: UiState { settings_index, ..UiState::default() },
            status: StatusState::default(),
            insights: HashMap::new(),
            edit: None,
            form: None,
            receipt_path: Editor::new(),
            notice: None,
            today: get_current_date_string(),
            log_path: None,
            last_briefed_revision: None,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::from_theme(&self.config.get_active_theme())
    }

    pub fn active_view(&self) -> View {
        self.store.active_view()
    }

    pub fn set_view(&mut self, view: View) {
        self.store.set_active_view(view);
        if !router::shows_sidebar(view) {
            self.ui.focus = Focus::Main;
        }
    }

    pub fn toggle_focus(&mut self) {
        if !router::shows_sidebar(self.active_view()) {
            return;
        }
        self.ui.focus = match self.ui.focus {
            Focus::Main => Focus::Sidebar,
            Focus::Sidebar => Focus::Main,
        };
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn show_notice(&mut self, title: &str, message: impl Into<String>) {
        self.notice = Some(Notice {
            title: title.to_string(),
            message: message.into(),
        });
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Per-frame housekeeping: apply finished AI work, expire the status
    /// line, and keep the Home briefing in step with the task list.
    pub fn tick(&mut self) {
        for completion in self.dispatcher.drain() {
            self.apply_completion(completion);
        }
        self.check_status_message_timeout();
        self.refresh_briefing_if_stale();
    }

    fn refresh_briefing_if_stale(&mut self) {
        if self.active_view() != View::Home {
            return;
        }
        let revision = self.store.tasks_revision();
        if self.last_briefed_revision != Some(revision) {
            self.regenerate_briefing();
        }
    }

    /// Start a fresh briefing, replacing any in flight.
    pub fn regenerate_briefing(&mut self) {
        self.last_briefed_revision = Some(self.store.tasks_revision());
        self.insights.remove(&Control::DailyBriefing);
        self.dispatcher
            .refresh(Control::DailyBriefing, AiJob::DailyBriefing(self.store.tasks()));
    }

    pub fn apply_completion(&mut self, completion: AiCompletion) {
        let control = completion.control;
        match completion.outcome {
            AiOutcome::Text(Ok(text)) => {
                self.insights.insert(control, text);
            }
            AiOutcome::Text(Err(e)) => {
                warn!("{} failed: {}", control.label(), e);
                self.insights.insert(control, control.fallback_text(&e));
            }
            AiOutcome::Receipt(result) => self.apply_receipt_scan(result),
        }
    }

    fn apply_receipt_scan(&mut self, result: AiResult<ReceiptScan>) {
        let scan = match result {
            Ok(scan) => scan,
            Err(e) if !self.dispatcher.gateway().is_enabled() => {
                self.show_notice("Receipt Scan", Control::ReceiptScan.fallback_text(&e));
                return;
            }
            Err(e) => {
                warn!("receipt scan failed: {}", e);
                ReceiptScan::failed()
            }
        };
        match finance::transaction_from_receipt(&scan, &self.today) {
            Ok(transaction) => {
                let message = format!(
                    "Receipt added: {} ${:.2}",
                    transaction.description, transaction.amount
                );
                self.store.add_transaction(transaction);
                self.set_status_message(message);
            }
            Err(e) => {
                info!("receipt rejected: {}", e);
                self.show_notice("Receipt Scan", e.to_string());
            }
        }
    }

    /// Insight control shown on a view, if it has one
    pub fn control_for_view(view: View) -> Option<Control> {
        match view {
            View::Home => Some(Control::DailyBriefing),
            View::Completion => Some(Control::CompletionAnalysis),
            View::Highlights => Some(Control::AchievementInsight),
            View::Personal => Some(Control::ReflectionSummary),
            View::Finance => Some(Control::SpendingInsight),
            View::Agenda | View::Settings => None,
        }
    }

    /// Why a control's button is disabled right now, if it is
    pub fn disabled_reason(&self, control: Control) -> Option<&'static str> {
        match control {
            Control::CompletionAnalysis if self.store.tasks().is_empty() => {
                Some("No tasks to analyse yet")
            }
            Control::ReflectionSummary if self.store.journal_text().trim().is_empty() => {
                Some("Write some notes first")
            }
            _ => None,
        }
    }

    fn job_for(&self, control: Control) -> Option<AiJob> {
        match control {
            Control::DailyBriefing => Some(AiJob::DailyBriefing(self.store.tasks())),
            Control::CompletionAnalysis => Some(AiJob::CompletionAnalysis(self.store.tasks())),
            Control::AchievementInsight => Some(AiJob::AchievementInsight(self.store.achievements())),
            Control::ReflectionSummary => Some(AiJob::ReflectionSummary(
                self.store.mood(),
                self.store.journal_text().to_string(),
            )),
            Control::SpendingInsight => Some(AiJob::SpendingInsight(self.store.transactions())),
            Control::ReceiptScan => None,
        }
    }

    /// Generate the insight for the active view.
    pub fn request_insight(&mut self) {
        let Some(control) = Self::control_for_view(self.active_view()) else {
            return;
        };
        if control == Control::DailyBriefing {
            self.regenerate_briefing();
            return;
        }
        if let Some(reason) = self.disabled_reason(control) {
            self.set_status_message(reason.to_string());
            return;
        }
        let Some(job) = self.job_for(control) else {
            return;
        };
        if self.dispatcher.request(control, job) {
            self.insights.remove(&control);
        } else {
            self.set_status_message("Already generating...".to_string());
        }
    }

    pub fn copy_insight(&mut self) {
        let text = Self::control_for_view(self.active_view()).and_then(|c| self.insights.get(&c).cloned());
        let Some(text) = text else {
            self.set_status_message("Nothing to copy yet".to_string());
            return;
        };
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&text) {
                    self.set_status_message(format!("Failed to copy to clipboard: {}", e));
                } else {
                    self.set_status_message("Copied to clipboard".to_string());
                }
            }
            Err(_) => self.set_status_message("Failed to access clipboard".to_string()),
        }
    }

    // Selection

    fn list_len(&self) -> usize {
        if self.ui.focus == Focus::Sidebar {
            return progress::priority_tasks(&self.store.tasks()).len();
        }
        match self.active_view() {
            View::Agenda | View::Completion => self.store.tasks().len(),
            View::Highlights => self.store.achievements().len(),
            View::Finance => self.store.transactions().len(),
            View::Settings => ThemePreference::ALL.len(),
            View::Home | View::Personal => 0,
        }
    }

    fn selection_mut(&mut self) -> Option<&mut usize> {
        if self.ui.focus == Focus::Sidebar {
            return Some(&mut self.ui.sidebar_index);
        }
        match self.store.active_view() {
            View::Agenda => Some(&mut self.ui.agenda_index),
            View::Completion => Some(&mut self.ui.completion_index),
            View::Highlights => Some(&mut self.ui.highlight_index),
            View::Finance => Some(&mut self.ui.finance_index),
            View::Settings => Some(&mut self.ui.settings_index),
            View::Home | View::Personal => None,
        }
    }

    pub fn move_selection_up(&mut self) {
        if let Some(index) = self.selection_mut() {
            *index = index.saturating_sub(1);
        }
    }

    pub fn move_selection_down(&mut self) {
        let len = self.list_len();
        if let Some(index) = self.selection_mut() {
            if *index + 1 < len {
                *index += 1;
            }
        }
    }

    /// Keep every index inside its list after the lists change
    pub fn clamp_selections(&mut self) {
        let clamp = |index: &mut usize, len: usize| *index = (*index).min(len.saturating_sub(1));
        let tasks = self.store.tasks();
        clamp(&mut self.ui.agenda_index, tasks.len());
        clamp(&mut self.ui.completion_index, tasks.len());
        clamp(&mut self.ui.sidebar_index, progress::priority_tasks(&tasks).len());
        clamp(&mut self.ui.highlight_index, self.store.achievements().len());
        clamp(&mut self.ui.finance_index, self.store.transactions().len());
    }

    pub fn selected_agenda_task(&self) -> Option<Task> {
        let tasks = self.store.tasks();
        progress::agenda_order(&tasks).get(self.ui.agenda_index).map(|t| (*t).clone())
    }

    pub fn selected_completion_task(&self) -> Option<Task> {
        self.store.tasks().get(self.ui.completion_index).cloned()
    }

    pub fn selected_sidebar_task(&self) -> Option<Task> {
        let tasks = self.store.tasks();
        progress::priority_tasks(&tasks).get(self.ui.sidebar_index).map(|t| (*t).clone())
    }

    // Task actions

    pub fn toggle_priority_selected(&mut self) {
        let task = match self.ui.focus {
            Focus::Sidebar => self.selected_sidebar_task(),
            Focus::Main if self.active_view() == View::Agenda => self.selected_agenda_task(),
            Focus::Main => None,
        };
        if let Some(task) = task {
            self.store.update_task(&task.id, &TaskUpdate::priority(!task.is_priority));
            self.clamp_selections();
        }
    }

    pub fn toggle_completed_selected(&mut self) {
        if let Some(task) = self.selected_completion_task() {
            let status = progress::toggle_completed(task.status);
            self.store.update_task(&task.id, &TaskUpdate::status(status));
        }
    }

    pub fn toggle_unachieved_selected(&mut self) {
        if let Some(task) = self.selected_completion_task() {
            let status = progress::toggle_unachieved(task.status);
            self.store.update_task(&task.id, &TaskUpdate::status(status));
        }
    }

    pub fn notify_reschedule(&mut self) {
        if self.selected_completion_task().is_some() {
            self.show_notice("Reschedule", COMING_SOON_RESCHEDULE);
        }
    }

    pub fn notify_attach_proof(&mut self) {
        if !self.store.achievements().is_empty() {
            self.show_notice("Attach Proof", COMING_SOON_PROOF);
        }
    }

    pub fn cycle_mood(&mut self) {
        self.store.set_mood(self.store.mood().next());
    }

    // In-place text edits

    /// Start editing whatever `edit` means on the current view
    pub fn begin_edit(&mut self) {
        let target = match (self.ui.focus, self.active_view()) {
            (Focus::Sidebar, _) | (_, View::Personal) => Some(EditTarget::Journal),
            (Focus::Main, View::Completion) => match self.selected_completion_task() {
                Some(task) if task.status == TaskStatus::Unachieved => Some(EditTarget::Reason(task.id)),
                Some(_) => {
                    self.set_status_message("Mark the task unachieved to add a reason".to_string());
                    None
                }
                None => None,
            },
            (Focus::Main, View::Highlights) => self
                .store
                .achievements()
                .get(self.ui.highlight_index)
                .map(|a| EditTarget::Achievement(a.id.clone())),
            _ => None,
        };
        if let Some(target) = target {
            self.start_edit(target);
        }
    }

    fn start_edit(&mut self, target: EditTarget) {
        let text = match &target {
            EditTarget::Reason(id) => self.store.task(id).and_then(|t| t.reason.clone()).unwrap_or_default(),
            EditTarget::Achievement(id) => self
                .store
                .achievements()
                .iter()
                .find(|a| &a.id == id)
                .map(|a| a.text.clone())
                .unwrap_or_default(),
            EditTarget::Journal => self.store.journal_text().to_string(),
        };
        self.edit = Some(TextEdit {
            target,
            editor: Editor::from_string(&text),
        });
        self.ui.mode = Mode::EditText;
    }

    /// Write the editor text through to the store. Called after every change
    /// so other views see edits as they are typed.
    pub fn sync_edit(&mut self) {
        let Some(edit) = &self.edit else {
            return;
        };
        let text = edit.editor.to_string();
        match &edit.target {
            EditTarget::Reason(id) => {
                let id = id.clone();
                self.store.update_task(&id, &TaskUpdate::reason(text));
            }
            EditTarget::Achievement(id) => {
                let id = id.clone();
                self.store.update_achievement(&id, &text);
            }
            EditTarget::Journal => self.store.set_journal_text(text),
        }
    }

    pub fn finish_edit(&mut self) {
        self.sync_edit();
        self.edit = None;
        self.ui.mode = Mode::Browse;
    }

    // Finance

    pub fn open_transaction_form(&mut self) {
        self.form = Some(TransactionForm::new(&self.today));
        self.ui.mode = Mode::TransactionForm;
    }

    pub fn close_transaction_form(&mut self) {
        self.form = None;
        self.ui.mode = Mode::Browse;
    }

    /// Validate and add the form's transaction. On failure the form stays
    /// open and the error is shown in a notice.
    pub fn submit_transaction_form(&mut self) {
        let Some(form) = &self.form else {
            return;
        };
        match form.to_draft().validate() {
            Ok(transaction) => {
                self.store.add_transaction(transaction);
                self.ui.finance_index = 0;
                self.close_transaction_form();
                self.set_status_message("Transaction added".to_string());
            }
            Err(e) => {
                info!("transaction rejected: {}", e);
                self.show_notice("Invalid Transaction", e.to_string());
            }
        }
    }

    pub fn open_receipt_prompt(&mut self) {
        if self.dispatcher.is_pending(Control::ReceiptScan) {
            self.set_status_message("A receipt is already being scanned".to_string());
            return;
        }
        self.receipt_path = Editor::new();
        self.ui.mode = Mode::ReceiptPrompt;
    }

    pub fn close_receipt_prompt(&mut self) {
        self.ui.mode = Mode::Browse;
    }

    /// Load the image at the entered path and send it for scanning.
    pub fn submit_receipt_prompt(&mut self) {
        let raw = self.receipt_path.to_string();
        let raw = raw.trim();
        if raw.is_empty() {
            return;
        }
        self.close_receipt_prompt();
        self.scan_receipt_file(&expand_path(raw));
    }

    pub fn scan_receipt_file(&mut self, path: &Path) {
        match ReceiptImage::load(path) {
            Ok(image) => {
                if self.dispatcher.request(Control::ReceiptScan, AiJob::ParseReceipt(image)) {
                    self.set_status_message("Scanning receipt...".to_string());
                } else {
                    self.set_status_message("A receipt is already being scanned".to_string());
                }
            }
            Err(e) => self.show_notice("Receipt Scan", e.to_string()),
        }
    }

    // Settings

    pub fn apply_selected_theme(&mut self) {
        let theme = ThemePreference::ALL
            .get(self.ui.settings_index)
            .copied()
            .unwrap_or_default();
        self.config.theme = theme;
        let path = self.config_path.clone();
        match self.config.save_to_path(&path) {
            Ok(()) => self.set_status_message(format!("Theme set to {}", theme.label())),
            Err(e) => {
                warn!("could not save config: {}", e);
                self.set_status_message(format!("Theme set, but saving failed: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiError;
    use crate::ai::gateway::tests::StubClient;
    use crate::models::Mood;
    use std::time::Duration;

    fn test_app() -> App {
        App::new(Config::default(), PathBuf::from("/nonexistent/config.toml"), Gateway::disabled())
    }

    fn settle(app: &mut App, control: Control) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.dispatcher.is_pending(control) && Instant::now() < deadline {
            app.tick();
            std::thread::sleep(Duration::from_millis(5));
        }
        app.tick();
    }

    #[test]
    fn sidebar_focus_resets_on_views_without_sidebar() {
        let mut app = test_app();
        app.set_view(View::Agenda);
        app.toggle_focus();
        assert_eq!(app.ui.focus, Focus::Sidebar);
        app.set_view(View::Finance);
        assert_eq!(app.ui.focus, Focus::Main);
        app.toggle_focus();
        assert_eq!(app.ui.focus, Focus::Main);
    }

    #[test]
    fn home_requests_briefing_once_per_revision() {
        let mut app = test_app();
        app.tick();
        settle(&mut app, Control::DailyBriefing);
        assert_eq!(
            app.insights.get(&Control::DailyBriefing).map(String::as_str),
            Some("Could not generate your daily briefing. Please check your API key.")
        );

        app.tick();
        assert!(app.insights.contains_key(&Control::DailyBriefing));

        app.set_view(View::Agenda);
        app.toggle_priority_selected();
        app.set_view(View::Home);
        app.tick();
        assert!(!app.insights.contains_key(&Control::DailyBriefing));
        settle(&mut app, Control::DailyBriefing);
        assert!(app.insights.contains_key(&Control::DailyBriefing));
    }

    #[test]
    fn completion_toggles_follow_status_rules() {
        let mut app = test_app();
        app.set_view(View::Completion);
        app.ui.completion_index = 3;
        let id = app.selected_completion_task().unwrap().id;
        assert_eq!(app.store.task(&id).unwrap().status, TaskStatus::Pending);

        app.toggle_completed_selected();
        assert_eq!(app.store.task(&id).unwrap().status, TaskStatus::Completed);
        app.toggle_unachieved_selected();
        assert_eq!(app.store.task(&id).unwrap().status, TaskStatus::Unachieved);
        app.toggle_unachieved_selected();
        assert_eq!(app.store.task(&id).unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn reason_edit_requires_unachieved_and_writes_through() {
        let mut app = test_app();
        app.set_view(View::Completion);
        app.begin_edit();
        assert!(app.edit.is_none());
        assert!(app.status.message.is_some());

        app.toggle_unachieved_selected();
        app.begin_edit();
        let edit = app.edit.as_mut().unwrap();
        for c in "sick".chars() {
            edit.editor.insert_char(c);
        }
        app.sync_edit();
        let id = app.selected_completion_task().unwrap().id;
        assert_eq!(app.store.task(&id).unwrap().reason.as_deref(), Some("sick"));
        app.finish_edit();
        assert_eq!(app.ui.mode, Mode::Browse);
    }

    #[test]
    fn achievement_edit_is_live() {
        let mut app = test_app();
        app.set_view(View::Highlights);
        app.begin_edit();
        let edit = app.edit.as_mut().unwrap();
        edit.editor = Editor::from_string("Closed the release");
        app.sync_edit();
        assert_eq!(app.store.achievements()[0].text, "Closed the release");
    }

    #[test]
    fn reflection_disabled_while_notes_blank() {
        let mut app = test_app();
        app.set_view(View::Personal);
        app.store.set_journal_text("   ");
        app.request_insight();
        assert!(!app.dispatcher.is_pending(Control::ReflectionSummary));
        assert_eq!(app.status.message.as_deref(), Some("Write some notes first"));
    }

    #[test]
    fn completion_analysis_disabled_without_tasks() {
        let store = Store::new(Vec::new(), Vec::new(), Vec::new(), Mood::Neutral, String::new());
        let mut app = App::with_store(Config::default(), PathBuf::new(), Gateway::disabled(), store);
        app.set_view(View::Completion);
        app.request_insight();
        assert!(!app.dispatcher.is_pending(Control::CompletionAnalysis));
    }

    #[test]
    fn insight_failure_shows_fallback() {
        let stub = StubClient::replying(Err(AiError::Transport("offline".into())));
        let mut app = App::new(Config::default(), PathBuf::new(), Gateway::new(stub));
        app.set_view(View::Highlights);
        app.request_insight();
        settle(&mut app, Control::AchievementInsight);
        assert_eq!(
            app.insights.get(&Control::AchievementInsight).map(String::as_str),
            Some("Error: Could not generate response. Request failed: offline")
        );
    }

    #[test]
    fn invalid_transaction_keeps_form_open() {
        let mut app = test_app();
        app.open_transaction_form();
        app.form.as_mut().unwrap().amount = Editor::from_string("12");
        let before = app.store.transactions().len();
        app.submit_transaction_form();
        assert_eq!(app.store.transactions().len(), before);
        assert!(app.form.is_some());
        assert_eq!(app.notice.as_ref().unwrap().message, "Description is required");
    }

    #[test]
    fn valid_transaction_is_prepended() {
        let mut app = test_app();
        app.open_transaction_form();
        let form = app.form.as_mut().unwrap();
        form.description = Editor::from_string("Coffee");
        form.amount = Editor::from_string("4.5");
        app.submit_transaction_form();
        assert!(app.form.is_none());
        assert_eq!(app.ui.mode, Mode::Browse);
        let first = &app.store.transactions()[0];
        assert_eq!(first.description, "Coffee");
        assert_eq!(first.kind, TransactionKind::Expense);
        assert_eq!(first.date, app.today);
    }

    #[test]
    fn failed_receipt_scan_adds_nothing() {
        let stub = StubClient::replying(Err(AiError::EmptyResponse));
        let mut app = App::new(Config::default(), PathBuf::new(), Gateway::new(stub));
        let before = app.store.transactions().len();
        app.apply_completion(AiCompletion {
            control: Control::ReceiptScan,
            outcome: AiOutcome::Receipt(Err(AiError::EmptyResponse)),
        });
        assert_eq!(app.store.transactions().len(), before);
        assert_eq!(
            app.notice.as_ref().unwrap().message,
            "Could not parse the receipt image. Please try again."
        );
    }

    #[test]
    fn unsupported_receipt_file_shows_notice() {
        let mut app = test_app();
        app.scan_receipt_file(Path::new("scan.gif"));
        assert!(app.notice.is_some());
        assert!(!app.dispatcher.is_pending(Control::ReceiptScan));
    }

    #[test]
    fn theme_choice_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut app = App::new(Config::default(), path.clone(), Gateway::disabled());
        app.set_view(View::Settings);
        app.ui.settings_index = 0;
        app.apply_selected_theme();
        assert_eq!(app.config.theme, ThemePreference::Light);
        let (saved, _) = Config::load_from_path(&path).unwrap();
        assert_eq!(saved.theme, ThemePreference::Light);
    }

    #[test]
    fn status_message_expires() {
        let mut app = test_app();
        app.set_status_message("hello".to_string());
        app.status.message_time = Some(Instant::now() - Duration::from_secs(4));
        app.check_status_message_timeout();
        assert!(app.status.message.is_none());
    }
}
