//! Single owner of the dashboard's mutable state.
//!
//! Collections are published as `Arc` snapshots. Every mutation builds a new
//! collection and swaps it in, so a snapshot handed out earlier (to a view or
//! to a background AI job) never changes underneath its holder.

use std::sync::Arc;

use log::debug;

use crate::models::{
    Achievement, FinancialTransaction, Mood, NewTransaction, Task, TaskUpdate, View,
};
use crate::seed;

#[derive(Debug, Clone)]
pub struct Store {
    tasks: Arc<Vec<Task>>,
    achievements: Arc<Vec<Achievement>>,
    transactions: Arc<Vec<FinancialTransaction>>,
    mood: Mood,
    journal_text: String,
    active_view: View,
    tasks_revision: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Store {
    pub fn new(
        tasks: Vec<Task>,
        achievements: Vec<Achievement>,
        transactions: Vec<FinancialTransaction>,
        mood: Mood,
        journal_text: String,
    ) -> Self {
        Self {
            tasks: Arc::new(tasks),
            achievements: Arc::new(achievements),
            transactions: Arc::new(transactions),
            mood,
            journal_text,
            active_view: View::Home,
            tasks_revision: 0,
        }
    }

    /// Store populated with the fixed start-of-session data.
    pub fn seeded() -> Self {
        Self::new(
            seed::initial_tasks(),
            seed::initial_achievements(),
            seed::initial_transactions(),
            seed::INITIAL_MOOD,
            seed::INITIAL_JOURNAL.to_string(),
        )
    }

    pub fn tasks(&self) -> Arc<Vec<Task>> {
        Arc::clone(&self.tasks)
    }

    pub fn achievements(&self) -> Arc<Vec<Achievement>> {
        Arc::clone(&self.achievements)
    }

    pub fn transactions(&self) -> Arc<Vec<FinancialTransaction>> {
        Arc::clone(&self.transactions)
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn journal_text(&self) -> &str {
        &self.journal_text
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    /// Bumped on every task mutation.
    pub fn tasks_revision(&self) -> u64 {
        self.tasks_revision
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Apply the set fields of `update` to the task with `id`.
    /// Returns false, without touching anything, when no task has that id.
    pub fn update_task(&mut self, id: &str, update: &TaskUpdate) -> bool {
        if !self.tasks.iter().any(|t| t.id == id) {
            debug!("update_task: no task with id {}", id);
            return false;
        }
        let tasks: Vec<Task> = self
            .tasks
            .iter()
            .map(|task| if task.id == id { update.apply_to(task) } else { task.clone() })
            .collect();
        self.tasks = Arc::new(tasks);
        self.tasks_revision += 1;
        true
    }

    /// Replace the text of the achievement with `id`. Unknown ids are ignored.
    pub fn update_achievement(&mut self, id: &str, text: &str) -> bool {
        if !self.achievements.iter().any(|a| a.id == id) {
            debug!("update_achievement: no achievement with id {}", id);
            return false;
        }
        let achievements: Vec<Achievement> = self
            .achievements
            .iter()
            .map(|a| {
                if a.id == id {
                    Achievement { text: text.to_string(), ..a.clone() }
                } else {
                    a.clone()
                }
            })
            .collect();
        self.achievements = Arc::new(achievements);
        true
    }

    /// Prepend a transaction with a freshly generated id. Returns the id.
    pub fn add_transaction(&mut self, transaction: NewTransaction) -> String {
        let mut id = generate_transaction_id();
        while self.transactions.iter().any(|t| t.id == id) {
            id = generate_transaction_id();
        }
        let mut transactions = Vec::with_capacity(self.transactions.len() + 1);
        transactions.push(transaction.with_id(id.clone()));
        transactions.extend(self.transactions.iter().cloned());
        self.transactions = Arc::new(transactions);
        debug!("added transaction {}", id);
        id
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    pub fn set_journal_text(&mut self, text: impl Into<String>) {
        self.journal_text = text.into();
    }

    pub fn set_active_view(&mut self, view: View) {
        self.active_view = view;
    }
}

/// Creation timestamp plus a random suffix.
fn generate_transaction_id() -> String {
    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", stamp, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TaskStatus, TransactionKind};

    fn coffee() -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Expense,
            category: Category::Food,
            amount: 4.5,
            date: "2025-10-30".to_string(),
            description: "Coffee".to_string(),
        }
    }

    #[test]
    fn update_task_replaces_only_named_fields() {
        let mut store = Store::seeded();
        let before = store.task("4").cloned().unwrap();
        assert!(store.update_task("4", &TaskUpdate::status(TaskStatus::Completed)));
        let after = store.task("4").unwrap();
        assert_eq!(after.status, TaskStatus::Completed);
        assert_eq!(after.title, before.title);
        assert_eq!(after.is_priority, before.is_priority);
        assert_eq!(store.tasks_revision(), 1);
    }

    #[test]
    fn update_task_with_unknown_id_is_a_no_op() {
        let mut store = Store::seeded();
        let snapshot = store.tasks();
        assert!(!store.update_task("missing", &TaskUpdate::priority(true)));
        assert!(Arc::ptr_eq(&snapshot, &store.tasks()));
        assert_eq!(store.tasks_revision(), 0);
    }

    #[test]
    fn earlier_snapshots_stay_unchanged() {
        let mut store = Store::seeded();
        let snapshot = store.tasks();
        store.update_task("2", &TaskUpdate::priority(false));
        assert!(snapshot.iter().find(|t| t.id == "2").unwrap().is_priority);
        assert!(!store.task("2").unwrap().is_priority);
    }

    #[test]
    fn update_achievement_sets_text() {
        let mut store = Store::seeded();
        assert!(store.update_achievement("3", "Closed the tricky bug"));
        assert_eq!(store.achievements()[2].text, "Closed the tricky bug");
        assert!(!store.update_achievement("9", "nope"));
    }

    #[test]
    fn add_transaction_prepends_and_preserves_the_rest() {
        let mut store = Store::seeded();
        let before = store.transactions();
        let id = store.add_transaction(coffee());
        let after = store.transactions();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[0].id, id);
        assert_eq!(after[0].description, "Coffee");
        assert_eq!(&after[1..], &before[..]);
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut store = Store::seeded();
        let a = store.add_transaction(coffee());
        let b = store.add_transaction(coffee());
        assert_ne!(a, b);
    }

    #[test]
    fn scalar_setters_replace_values() {
        let mut store = Store::seeded();
        store.set_mood(Mood::Sad);
        store.set_journal_text("rough day");
        store.set_active_view(View::Finance);
        assert_eq!(store.mood(), Mood::Sad);
        assert_eq!(store.journal_text(), "rough day");
        assert_eq!(store.active_view(), View::Finance);
    }
}
