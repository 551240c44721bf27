//! Start-of-session data. Nothing is persisted, so every run begins here.

use crate::models::{
    Achievement, Category, FinancialTransaction, Mood, Task, TaskStatus, TaskType, TransactionKind,
};

pub const INITIAL_MOOD: Mood = Mood::Happy;

pub const INITIAL_JOURNAL: &str = "It was a productive day. The new feature is coming along well, \
but I'm a bit stuck on a tricky bug. Had a good lunch with the team. Feeling optimistic about the Q4 roadmap.";

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    title: &str,
    task_type: TaskType,
    time: &str,
    duration: u32,
    notes: Option<&str>,
    status: TaskStatus,
    is_priority: bool,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        task_type,
        time: time.to_string(),
        duration,
        notes: notes.map(str::to_string),
        status,
        reason: None,
        is_priority,
    }
}

pub fn initial_tasks() -> Vec<Task> {
    vec![
        task("1", "Morning Stand-up", TaskType::Meeting, "09:00", 15, Some("Project Phoenix stand-up."), TaskStatus::Completed, false),
        task("2", "Develop new feature", TaskType::Task, "09:30", 120, Some("Work on the user authentication flow."), TaskStatus::Completed, true),
        task("3", "Lunch Break", TaskType::Break, "12:30", 60, None, TaskStatus::Completed, false),
        task("4", "Code Review", TaskType::Task, "14:00", 45, Some("Review PR from Jane."), TaskStatus::Pending, true),
        task("5", "Team Sync", TaskType::Meeting, "15:00", 30, Some("Discuss Q4 roadmap."), TaskStatus::Pending, false),
    ]
}

pub fn initial_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new("1", "Shipped the new authentication feature ahead of schedule."),
        Achievement::new("2", "Received positive feedback on the UI mockups."),
        Achievement::new("3", ""),
    ]
}

pub fn initial_transactions() -> Vec<FinancialTransaction> {
    let entry = |id: &str, kind, category, amount, description: &str| FinancialTransaction {
        id: id.to_string(),
        kind,
        category,
        amount,
        date: "2025-10-29".to_string(),
        description: description.to_string(),
    };
    vec![
        entry("1", TransactionKind::Expense, Category::Food, 15.75, "Coffee and Sandwich"),
        entry("2", TransactionKind::Expense, Category::Transport, 22.50, "Gasoline"),
        entry("3", TransactionKind::Income, Category::Salary, 1500.0, "Bi-weekly Paycheck"),
    ]
}
