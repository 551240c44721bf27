use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Task,
    Meeting,
    Break,
}

impl TaskType {
    pub fn label(self) -> &'static str {
        match self {
            TaskType::Task => "Task",
            TaskType::Meeting => "Meeting",
            TaskType::Break => "Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Completed,
    Unachieved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub time: String,   // HH:MM, zero-padded 24h
    pub duration: u32,  // minutes
    pub notes: Option<String>,
    pub status: TaskStatus,
    pub reason: Option<String>,
    pub is_priority: bool,
}

/// Partial update for a task. Only the fields that are `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub task_type: Option<TaskType>,
    pub time: Option<String>,
    pub duration: Option<u32>,
    pub notes: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub reason: Option<Option<String>>,
    pub is_priority: Option<bool>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    pub fn priority(is_priority: bool) -> Self {
        Self { is_priority: Some(is_priority), ..Self::default() }
    }

    pub fn reason(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            reason: Some(if reason.is_empty() { None } else { Some(reason) }),
            ..Self::default()
        }
    }

    /// Apply the set fields to `task`, returning the updated copy.
    pub fn apply_to(&self, task: &Task) -> Task {
        let mut updated = task.clone();
        if let Some(ref title) = self.title {
            updated.title = title.clone();
        }
        if let Some(task_type) = self.task_type {
            updated.task_type = task_type;
        }
        if let Some(ref time) = self.time {
            updated.time = time.clone();
        }
        if let Some(duration) = self.duration {
            updated.duration = duration;
        }
        if let Some(ref notes) = self.notes {
            updated.notes = notes.clone();
        }
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(ref reason) = self.reason {
            updated.reason = reason.clone();
        }
        if let Some(is_priority) = self.is_priority {
            updated.is_priority = is_priority;
        }
        updated
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub text: String,
    /// Path of an attached proof file. Attaching is not implemented yet.
    pub proof: Option<String>,
}

impl Achievement {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            proof: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Sad,
    Neutral,
    Happy,
    Ecstatic,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Sad, Mood::Neutral, Mood::Happy, Mood::Ecstatic];

    pub fn symbol(self) -> &'static str {
        match self {
            Mood::Sad => "😞",
            Mood::Neutral => "😐",
            Mood::Happy => "😊",
            Mood::Ecstatic => "😄",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Sad => "Sad",
            Mood::Neutral => "Neutral",
            Mood::Happy => "Happy",
            Mood::Ecstatic => "Ecstatic",
        }
    }

    /// Next mood in selector order, wrapping around.
    pub fn next(self) -> Mood {
        let index = Mood::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Mood::ALL[(index + 1) % Mood::ALL.len()]
    }

    pub fn previous(self) -> Mood {
        let index = Mood::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Mood::ALL[(index + Mood::ALL.len() - 1) % Mood::ALL.len()]
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn toggled(self) -> Self {
        match self {
            TransactionKind::Income => TransactionKind::Expense,
            TransactionKind::Expense => TransactionKind::Income,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Utilities,
    Entertainment,
    Health,
    Subscriptions,
    Salary,
    Freelance,
    Investment,
    Gift,
    Other,
    Receipt,
}

impl Category {
    pub const EXPENSE: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Utilities,
        Category::Entertainment,
        Category::Health,
        Category::Subscriptions,
        Category::Other,
    ];

    pub const INCOME: [Category; 5] = [
        Category::Salary,
        Category::Freelance,
        Category::Investment,
        Category::Gift,
        Category::Other,
    ];

    /// Categories a user may pick for the given kind. `Receipt` is reserved
    /// for scanned receipts and never offered.
    pub fn for_kind(kind: TransactionKind) -> &'static [Category] {
        match kind {
            TransactionKind::Expense => &Self::EXPENSE,
            TransactionKind::Income => &Self::INCOME,
        }
    }

    pub fn is_valid_for(self, kind: TransactionKind) -> bool {
        Self::for_kind(kind).contains(&self)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Subscriptions => "Subscriptions",
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investment => "Investment",
            Category::Gift => "Gift",
            Category::Other => "Other",
            Category::Receipt => "Receipt",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: Category,
    pub amount: f64,
    pub date: String, // YYYY-MM-DD
    pub description: String,
}

/// A transaction that has not been assigned an id by the store yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub category: Category,
    pub amount: f64,
    pub date: String,
    pub description: String,
}

impl NewTransaction {
    pub fn with_id(self, id: String) -> FinancialTransaction {
        FinancialTransaction {
            id,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            date: self.date,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Agenda,
    Completion,
    Highlights,
    Personal,
    Finance,
    Settings,
}

impl View {
    /// Navigation order.
    pub const ALL: [View; 7] = [
        View::Home,
        View::Agenda,
        View::Completion,
        View::Highlights,
        View::Personal,
        View::Finance,
        View::Settings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Agenda => "Agenda",
            View::Completion => "Completion",
            View::Highlights => "Highlights",
            View::Personal => "Personal",
            View::Finance => "Finance",
            View::Settings => "Settings",
        }
    }

    pub fn index(self) -> usize {
        View::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    /// Unknown indices fall back to Home.
    pub fn from_index(index: usize) -> View {
        View::ALL.get(index).copied().unwrap_or(View::Home)
    }

    pub fn next(self) -> View {
        View::from_index((self.index() + 1) % View::ALL.len())
    }

    pub fn previous(self) -> View {
        View::from_index((self.index() + View::ALL.len() - 1) % View::ALL.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: "1".to_string(),
            title: "Code Review".to_string(),
            task_type: TaskType::Task,
            time: "14:00".to_string(),
            duration: 45,
            notes: Some("Review PR from Jane.".to_string()),
            status: TaskStatus::Pending,
            reason: None,
            is_priority: true,
        }
    }

    #[test]
    fn task_update_only_touches_set_fields() {
        let task = sample_task();
        let updated = TaskUpdate::status(TaskStatus::Completed).apply_to(&task);
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.title, task.title);
        assert_eq!(updated.notes, task.notes);
        assert!(updated.is_priority);
    }

    #[test]
    fn empty_reason_clears_field() {
        let mut task = sample_task();
        task.reason = Some("blocked".to_string());
        let updated = TaskUpdate::reason("").apply_to(&task);
        assert_eq!(updated.reason, None);
    }

    #[test]
    fn categories_depend_on_kind() {
        assert!(Category::Food.is_valid_for(TransactionKind::Expense));
        assert!(!Category::Food.is_valid_for(TransactionKind::Income));
        assert!(Category::Salary.is_valid_for(TransactionKind::Income));
        assert!(Category::Other.is_valid_for(TransactionKind::Income));
        assert!(!Category::Receipt.is_valid_for(TransactionKind::Expense));
    }

    #[test]
    fn view_index_falls_back_to_home() {
        assert_eq!(View::from_index(3), View::Highlights);
        assert_eq!(View::from_index(42), View::Home);
        assert_eq!(View::Settings.next(), View::Home);
        assert_eq!(View::Home.previous(), View::Settings);
    }

    #[test]
    fn mood_cycles() {
        assert_eq!(Mood::Ecstatic.next(), Mood::Sad);
        assert_eq!(Mood::Sad.previous(), Mood::Ecstatic);
        assert_eq!(Mood::Happy.to_string(), "😊");
    }

    #[test]
    fn task_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample_task()).unwrap();
        assert_eq!(json["type"], "TASK");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["isPriority"], true);
    }
}
