//! Tasks and their priority/status enumerations

use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::index::DateKey;

/// An opaque, unique task identifier.
///
/// The backend mints UUIDs for tasks it creates; tasks created locally (before their first
/// upload) pick a random one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    /// Generate a random TaskId
    pub fn random() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<TaskId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let content = String::deserialize(deserializer)?;
        Ok(TaskId { content })
    }
}


/// Task priority, as reported by the backend.
///
/// Deserialization is deliberately lenient: an absent, null or unrecognized priority falls back
/// to [`Priority::default`] rather than rejecting the whole task record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse a wire value. Returns `None` for anything that is not a known priority.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// The display style for this priority
    pub fn style(&self) -> PriorityStyle {
        match self {
            Priority::High => PriorityStyle { color: "#ef4444", label: "High", weight: 3 },
            Priority::Medium => PriorityStyle { color: "#f59e0b", label: "Medium", weight: 2 },
            Priority::Low => PriorityStyle { color: "#3b82f6", label: "Low", weight: 1 },
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Low
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Priority, D::Error>
    where
        D: Deserializer<'de>,
    {
        // go through a Value so that a non-string priority degrades too, instead of
        // failing the whole record
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            Some(value) => Priority::from_wire(value).unwrap_or_else(|| {
                log::debug!("Unknown priority {:?}, using the default", value);
                Priority::default()
            }),
            None => {
                if !raw.is_null() {
                    log::debug!("Non-string priority {}, using the default", raw);
                }
                Priority::default()
            },
        })
    }
}

/// How a priority is displayed: a dot/chip color, a human label, and a sort/grouping weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriorityStyle {
    pub color: &'static str,
    pub label: &'static str,
    pub weight: u8,
}

impl PriorityStyle {
    /// The neutral style used when a task has no meaningful priority to show
    pub fn neutral() -> Self {
        PriorityStyle { color: "#6b7280", label: "None", weight: 0 }
    }
}

/// Total mapping from an optional priority to its display style.
///
/// `None` (and, upstream, every unrecognized wire value) gets the neutral style. This is a
/// display fallback, not a validation boundary.
pub fn priority_style(priority: Option<Priority>) -> PriorityStyle {
    match priority {
        Some(p) => p.style(),
        None => PriorityStyle::neutral(),
    }
}


/// Whether a task is still pending or already done
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}


/// A to-do task
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    /// The task ID, as minted by the backend (or randomly picked for local drafts)
    id: TaskId,

    /// The display title of the task
    title: String,

    #[serde(default)]
    priority: Priority,

    #[serde(default)]
    status: TaskStatus,

    /// When this task is due. `None` means the task is undated and will never show up in any
    /// calendar cell or date index entry.
    #[serde(default, with = "due_date_wire")]
    due_date: Option<NaiveDateTime>,

    /// A free-form category label
    #[serde(default)]
    category: Option<String>,

    /// The time this task was created. Populated for tasks created by this crate, but can be
    /// None for records coming from an older backend.
    #[serde(default, with = "due_date_wire")]
    created_at: Option<NaiveDateTime>,
}

impl Task {
    /// Create a brand new task that is not on the backend yet.
    /// This will pick a new (random) task ID.
    pub fn new(title: String, priority: Priority, due_date: Option<NaiveDateTime>, category: Option<String>) -> Self {
        Self {
            id: TaskId::random(),
            title,
            priority,
            status: TaskStatus::Pending,
            due_date,
            category,
            created_at: Some(Utc::now().naive_utc()),
        }
    }

    /// Create a task with every field supplied, e.g. when rebuilding one from another source
    pub fn new_with_parameters(id: TaskId, title: String, priority: Priority, status: TaskStatus,
                               due_date: Option<NaiveDateTime>, category: Option<String>,
                               created_at: Option<NaiveDateTime>,
                            ) -> Self
    {
        Self {
            id,
            title,
            priority,
            status,
            due_date,
            category,
            created_at,
        }
    }

    pub fn id(&self) -> &TaskId       { &self.id           }
    pub fn title(&self) -> &str       { &self.title        }
    pub fn priority(&self) -> Priority  { self.priority    }
    pub fn status(&self) -> TaskStatus  { self.status      }
    pub fn category(&self) -> Option<&str>  { self.category.as_deref() }
    pub fn due_date(&self) -> Option<&NaiveDateTime>   { self.due_date.as_ref()   }
    pub fn created_at(&self) -> Option<&NaiveDateTime> { self.created_at.as_ref() }

    pub fn completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// The date portion of the due date (time-of-day discarded), or `None` for undated tasks
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_date.map(|dt| dt.date())
    }

    /// The canonical `YYYY-MM-DD` key this task is filed under, or `None` for undated tasks
    pub fn due_key(&self) -> Option<DateKey> {
        self.due_day().map(DateKey::from)
    }

    pub fn set_title(&mut self, new_title: String) {
        self.title = new_title;
    }

    pub fn set_priority(&mut self, new_priority: Priority) {
        self.priority = new_priority;
    }

    pub fn set_due_date(&mut self, new_due_date: Option<NaiveDateTime>) {
        self.due_date = new_due_date;
    }

    pub fn set_category(&mut self, new_category: Option<String>) {
        self.category = new_category;
    }

    pub fn set_status(&mut self, new_status: TaskStatus) {
        self.status = new_status;
    }
}


/// Serde support for the backend's date-time wire format (`2024-03-05T10:00:00`, naive).
///
/// Deserialization is lenient: a malformed timestamp is treated as "undated" rather than
/// failing the whole record.
pub mod due_date_wire {
    use super::*;

    const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(WIRE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        // a Value keeps this total: a non-string timestamp is just as undated as a
        // malformed one
        let raw = serde_json::Value::deserialize(deserializer)?;
        match raw.as_str() {
            Some(value) => Ok(parse_lenient(value)),
            None => {
                if !raw.is_null() {
                    log::debug!("Non-string date {}, treating the task as undated", raw);
                }
                Ok(None)
            },
        }
    }

    /// Try the formats the backend has been seen emitting, then give up and call it undated
    pub fn parse_lenient(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return day.and_hms_opt(0, 0, 0);
        }
        log::debug!("Malformed date {:?}, treating the task as undated", raw);
        None
    }
}
