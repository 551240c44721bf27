//! Task-derived values shared by the Home, Agenda, Completion and sidebar views.

use crate::models::{Task, TaskStatus, TaskType};

/// Status after pressing "completed". A completed task goes back to pending,
/// anything else becomes completed.
pub fn toggle_completed(status: TaskStatus) -> TaskStatus {
    match status {
        TaskStatus::Completed => TaskStatus::Pending,
        _ => TaskStatus::Completed,
    }
}

/// Status after pressing "unachieved". Mirrors [`toggle_completed`].
pub fn toggle_unachieved(status: TaskStatus) -> TaskStatus {
    match status {
        TaskStatus::Unachieved => TaskStatus::Pending,
        _ => TaskStatus::Unachieved,
    }
}

/// Whole-number completion percentage; 0 for an empty list.
pub fn completion_rate(tasks: &[Task]) -> u8 {
    if tasks.is_empty() {
        return 0;
    }
    let completed = tasks.iter().filter(|t| t.status == TaskStatus::Completed).count();
    ((completed as f64 / tasks.len() as f64) * 100.0).round() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

pub fn day_counts(tasks: &[Task]) -> DayCounts {
    tasks.iter().fold(
        DayCounts { total: tasks.len(), ..DayCounts::default() },
        |mut counts, task| {
            match task.status {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Unachieved => {}
            }
            counts
        },
    )
}

/// Tasks ordered by scheduled time. "HH:MM" is zero-padded 24h, so string
/// order is time order.
pub fn agenda_order(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by(|a, b| a.time.cmp(&b.time));
    ordered
}

pub fn priority_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_priority).collect()
}

/// Tasks worth mentioning in a daily briefing: priorities and meetings.
pub fn briefing_candidates(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.is_priority || t.task_type == TaskType::Meeting)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn with_statuses(statuses: &[TaskStatus]) -> Vec<Task> {
        let template = seed::initial_tasks().remove(0);
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| Task {
                id: i.to_string(),
                status: *status,
                ..template.clone()
            })
            .collect()
    }

    #[test]
    fn completed_then_unachieved_never_both() {
        let status = toggle_completed(TaskStatus::Pending);
        assert_eq!(status, TaskStatus::Completed);
        let status = toggle_unachieved(status);
        assert_eq!(status, TaskStatus::Unachieved);
        assert_eq!(toggle_unachieved(status), TaskStatus::Pending);
        assert_eq!(toggle_completed(TaskStatus::Completed), TaskStatus::Pending);
        assert_eq!(toggle_completed(TaskStatus::Unachieved), TaskStatus::Completed);
    }

    #[test]
    fn rate_is_zero_for_empty_list() {
        assert_eq!(completion_rate(&[]), 0);
    }

    #[test]
    fn two_of_five_is_forty_percent() {
        use TaskStatus::*;
        let tasks = with_statuses(&[Completed, Completed, Pending, Pending, Unachieved]);
        assert_eq!(completion_rate(&tasks), 40);
    }

    #[test]
    fn rate_rounds_to_nearest() {
        use TaskStatus::*;
        let tasks = with_statuses(&[Completed, Pending, Pending]);
        assert_eq!(completion_rate(&tasks), 33);
        let tasks = with_statuses(&[Completed, Completed, Pending]);
        assert_eq!(completion_rate(&tasks), 67);
    }

    #[test]
    fn counts_match_seed() {
        let counts = day_counts(&seed::initial_tasks());
        assert_eq!(counts, DayCounts { total: 5, pending: 2, completed: 3 });
    }

    #[test]
    fn agenda_is_sorted_by_time() {
        let mut tasks = seed::initial_tasks();
        tasks.reverse();
        let times: Vec<&str> = agenda_order(&tasks).iter().map(|t| t.time.as_str()).collect();
        assert_eq!(times, vec!["09:00", "09:30", "12:30", "14:00", "15:00"]);
    }

    #[test]
    fn briefing_candidates_are_priorities_and_meetings() {
        let tasks = seed::initial_tasks();
        let ids: Vec<&str> = briefing_candidates(&tasks).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4", "5"]);
    }
}
