//! Derived task views: status filtering, text search, and the dashboard selectors

use itertools::Itertools;

use crate::grid::Today;
use crate::task::{Priority, Task, TaskStatus};

/// The status chips of the task list view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    /// Pending tasks only
    Active,
    Completed,
    /// High-priority tasks, whatever their status
    HighPriority,
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl StatusFilter {
    fn accepts(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => task.status() == TaskStatus::Pending,
            StatusFilter::Completed => task.status() == TaskStatus::Completed,
            StatusFilter::HighPriority => task.priority() == Priority::High,
        }
    }
}

/// The task list view's filter state
#[derive(Clone, Debug, Default)]
pub struct TaskFilter {
    pub status: StatusFilter,
    /// Case-insensitive substring search over title and category
    pub search: Option<String>,
}

impl TaskFilter {
    fn matches_search(&self, task: &Task) -> bool {
        let query = match &self.search {
            Some(q) if !q.trim().is_empty() => q.trim().to_lowercase(),
            _ => return true,
        };
        if task.title().to_lowercase().contains(&query) {
            return true;
        }
        task.category().map(|c| c.to_lowercase().contains(&query)).unwrap_or(false)
    }
}

/// Apply a filter to a task list, preserving input order
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    tasks.iter()
        .filter(|task| filter.status.accepts(task))
        .filter(|task| filter.matches_search(task))
        .collect()
}

/// A dated, pending task whose due day is already behind us
pub fn is_overdue(task: &Task, today: &Today) -> bool {
    match task.due_day() {
        Some(day) => task.status() == TaskStatus::Pending && day < today.date(),
        None => false,
    }
}

/// The dashboard's "recent tasks" strip: newest first by creation time, truncated.
/// Tasks without a creation time sort last.
pub fn recent_tasks<'a>(tasks: &'a [Task], limit: usize) -> Vec<&'a Task> {
    tasks.iter()
        .sorted_by(|a, b| b.created_at().cmp(&a.created_at()))
        .take(limit)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::due_date_wire;
    use chrono::NaiveDate;

    fn task(title: &str, priority: Priority, status: TaskStatus, category: Option<&str>) -> Task {
        let mut task = Task::new(title.to_string(), priority, None, category.map(String::from));
        task.set_status(status);
        task
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            task("Pay rent", Priority::High, TaskStatus::Pending, Some("home")),
            task("Buy milk", Priority::Low, TaskStatus::Completed, Some("groceries")),
            task("Renew passport", Priority::High, TaskStatus::Completed, None),
            task("Call mom", Priority::Medium, TaskStatus::Pending, None),
        ]
    }

    #[test]
    fn status_filters() {
        let tasks = sample_tasks();
        let pick = |status| {
            let filter = TaskFilter { status, search: None };
            filter_tasks(&tasks, &filter).len()
        };
        assert_eq!(pick(StatusFilter::All), 4);
        assert_eq!(pick(StatusFilter::Active), 2);
        assert_eq!(pick(StatusFilter::Completed), 2);
        assert_eq!(pick(StatusFilter::HighPriority), 2);
    }

    #[test]
    fn search_matches_title_and_category() {
        let tasks = sample_tasks();
        let search = |query: &str| {
            let filter = TaskFilter { status: StatusFilter::All, search: Some(query.to_string()) };
            filter_tasks(&tasks, &filter).len()
        };
        assert_eq!(search("RENT"), 1);
        assert_eq!(search("groceries"), 1);
        assert_eq!(search("  "), 4);
        assert_eq!(search("nothing matches this"), 0);
    }

    #[test]
    fn overdue_needs_a_past_due_day_and_a_pending_status() {
        let today = Today::fixed(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let mut late = task("Late", Priority::Low, TaskStatus::Pending, None);
        late.set_due_date(due_date_wire::parse_lenient("2024-02-20T10:00:00"));
        assert!(is_overdue(&late, &today));

        // due later today is not overdue
        late.set_due_date(due_date_wire::parse_lenient("2024-03-01T23:00:00"));
        assert!(!is_overdue(&late, &today));

        late.set_due_date(due_date_wire::parse_lenient("2024-02-20T10:00:00"));
        late.set_status(TaskStatus::Completed);
        assert!(!is_overdue(&late, &today));

        let undated = task("Undated", Priority::Low, TaskStatus::Pending, None);
        assert!(!is_overdue(&undated, &today));
    }

    #[test]
    fn recent_tasks_are_newest_first() {
        let mk = |title: &str, created: &str| {
            Task::new_with_parameters(
                title.into(),
                title.to_string(),
                Priority::Low,
                TaskStatus::Pending,
                None,
                None,
                due_date_wire::parse_lenient(created),
            )
        };
        let tasks = vec![
            mk("old", "2024-01-01T08:00:00"),
            mk("newest", "2024-03-01T08:00:00"),
            mk("middle", "2024-02-01T08:00:00"),
        ];
        let recent = recent_tasks(&tasks, 2);
        let titles: Vec<&str> = recent.iter().map(|t| t.title()).collect();
        assert_eq!(titles, vec!["newest", "middle"]);
    }
}
