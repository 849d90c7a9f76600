//! Date keys and the per-day task index

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;

use crate::task::Task;

/// How many tasks the "upcoming" sidebar shows
pub const UPCOMING_TASKS_LIMIT: usize = 5;

/// A canonical `YYYY-MM-DD` date key.
///
/// The derivation is lossless and round-trippable: the same calendar date always renders the
/// same key, distinct dates never collide, and (the year being zero-padded to four digits)
/// lexicographic order on the rendered keys matches chronological order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
    date: NaiveDate,
}

impl DateKey {
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self { date }
    }
}
impl From<NaiveDateTime> for DateKey {
    fn from(dt: NaiveDateTime) -> Self {
        Self { date: dt.date() }
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
        Ok(Self { date })
    }
}


/// A mapping from date keys to the tasks due that day.
///
/// This is ephemeral derived state: it borrows the task list and is rebuilt from scratch
/// whenever that list changes. Undated tasks appear in no entry; within an entry, tasks keep
/// their input order.
#[derive(Debug)]
pub struct DateIndex<'a> {
    by_day: HashMap<DateKey, Vec<&'a Task>>,
}

impl<'a> DateIndex<'a> {
    /// Build the index for a task list
    pub fn build(tasks: &'a [Task]) -> Self {
        let mut by_day: HashMap<DateKey, Vec<&'a Task>> = HashMap::new();
        for task in tasks {
            if let Some(key) = task.due_key() {
                by_day.entry(key).or_default().push(task);
            }
        }
        log::trace!("Indexed {} tasks over {} distinct days", tasks.len(), by_day.len());
        Self { by_day }
    }

    /// The tasks due on a given day, in input order. Empty for days nothing is due on.
    pub fn tasks_on(&self, key: &DateKey) -> &[&'a Task] {
        self.by_day.get(key).map(|tasks| tasks.as_slice()).unwrap_or(&[])
    }

    /// The number of distinct days that have at least one task due
    pub fn day_count(&self) -> usize {
        self.by_day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}


/// Select the next upcoming tasks: dated, not completed, and due today or later.
///
/// Inclusion compares date keys only, so a task due earlier today still counts whatever its
/// time-of-day. Ordering then uses the full due-date timestamp, ascending; ties keep their
/// original relative order (the sort is stable). At most [`UPCOMING_TASKS_LIMIT`] tasks are
/// returned.
pub fn upcoming_tasks<'a>(tasks: &'a [Task], today: DateKey) -> Vec<&'a Task> {
    tasks.iter()
        .filter(|task| !task.completed())
        .filter(|task| matches!(task.due_key(), Some(key) if key >= today))
        .sorted_by_key(|task| task.due_date().copied())
        .take(UPCOMING_TASKS_LIMIT)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{due_date_wire, Priority, TaskStatus};

    fn task(title: &str, due: Option<&str>, status: TaskStatus) -> Task {
        let mut task = Task::new(
            title.to_string(),
            Priority::Medium,
            due.and_then(due_date_wire::parse_lenient),
            None,
        );
        task.set_status(status);
        task
    }

    #[test]
    fn date_key_round_trips() {
        let key: DateKey = "2024-03-05".parse().unwrap();
        assert_eq!(key.to_string(), "2024-03-05");
        assert_eq!(key, DateKey::from(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()));

        // zero-padding keeps lexicographic and chronological order aligned
        let earlier: DateKey = "2024-09-30".parse().unwrap();
        let later: DateKey = "2024-10-01".parse().unwrap();
        assert!(earlier < later);
        assert!(earlier.to_string() < later.to_string());
    }

    #[test]
    fn index_files_tasks_under_their_day() {
        let tasks = vec![
            task("Dentist", Some("2024-03-05T10:00:00"), TaskStatus::Pending),
            task("No deadline", None, TaskStatus::Pending),
            task("Groceries", Some("2024-03-05T18:30:00"), TaskStatus::Pending),
        ];
        let index = DateIndex::build(&tasks);

        let key: DateKey = "2024-03-05".parse().unwrap();
        let due = index.tasks_on(&key);
        assert_eq!(due.len(), 2);
        // input order preserved, no re-sorting
        assert_eq!(due[0].title(), "Dentist");
        assert_eq!(due[1].title(), "Groceries");

        assert_eq!(index.day_count(), 1);
        let empty: DateKey = "2024-03-06".parse().unwrap();
        assert!(index.tasks_on(&empty).is_empty());
    }

    #[test]
    fn undated_tasks_are_never_indexed() {
        let tasks = vec![task("Someday", None, TaskStatus::Pending)];
        let index = DateIndex::build(&tasks);
        assert!(index.is_empty());
    }

    #[test]
    fn upcoming_skips_past_and_completed_tasks() {
        let tasks = vec![
            task("Due soon", Some("2024-03-05T10:00:00"), TaskStatus::Pending),
            task("Already late", Some("2024-02-20T10:00:00"), TaskStatus::Pending),
            task("Already done", Some("2024-03-10T10:00:00"), TaskStatus::Completed),
        ];
        let today: DateKey = "2024-03-01".parse().unwrap();

        let upcoming = upcoming_tasks(&tasks, today);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].title(), "Due soon");
    }

    #[test]
    fn upcoming_includes_today_regardless_of_time() {
        let tasks = vec![task("This morning", Some("2024-03-01T06:00:00"), TaskStatus::Pending)];
        let today: DateKey = "2024-03-01".parse().unwrap();
        assert_eq!(upcoming_tasks(&tasks, today).len(), 1);
    }

    #[test]
    fn upcoming_sort_is_stable_and_truncated() {
        let tasks = vec![
            task("f", Some("2024-03-09T09:00:00"), TaskStatus::Pending),
            task("a", Some("2024-03-05T10:00:00"), TaskStatus::Pending),
            task("b", Some("2024-03-05T10:00:00"), TaskStatus::Pending),
            task("c", Some("2024-03-04T08:00:00"), TaskStatus::Pending),
            task("d", Some("2024-03-07T12:00:00"), TaskStatus::Pending),
            task("e", Some("2024-03-08T12:00:00"), TaskStatus::Pending),
        ];
        let today: DateKey = "2024-03-01".parse().unwrap();

        let upcoming = upcoming_tasks(&tasks, today);
        let titles: Vec<&str> = upcoming.iter().map(|t| t.title()).collect();
        // "a" and "b" share a timestamp and keep their input order; "f" falls past the limit
        assert_eq!(titles, vec!["c", "a", "b", "d", "e"]);
    }
}
