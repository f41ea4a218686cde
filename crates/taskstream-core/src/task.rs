//! Task model, creation drafts, and merge patches.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use time::{Duration, OffsetDateTime};

use crate::error::{Error, Result};
use crate::id::{TaskId, UserId};

/// Lifecycle status of a task.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Pending,
    /// Being worked on.
    InProgress,
    /// Finished.
    Completed,
}

impl TaskStatus {
    /// Serialized token, also used for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(Error::validation(format!("unknown status: {s}"))),
        }
    }
}

/// Priority of a task.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal urgency.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl TaskPriority {
    /// Serialized token, also used for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(Error::validation(format!("unknown priority: {s}"))),
        }
    }
}

/// One unit of work on a board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier, immutable after creation.
    pub id: TaskId,
    /// Non-empty display title.
    pub title: String,
    /// Optional free-text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Urgency bucket.
    pub priority: TaskPriority,
    /// Optional deadline; absence means the task never becomes overdue.
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<OffsetDateTime>,
    /// Email of the responsible party, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Emails with read visibility, in insertion order, no duplicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_with: Vec<String>,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last-mutation timestamp; never decreases.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Owning identity, immutable after creation.
    pub user_id: UserId,
}

impl Task {
    /// Materialize a draft into a task owned by `user_id`.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when the title is blank.
    pub fn create(draft: TaskDraft, user_id: UserId, now: OffsetDateTime) -> Result<Self> {
        let TaskDraft {
            title,
            description,
            status,
            priority,
            due_date,
            assigned_to,
            shared_with,
        } = draft;

        let title = title.trim().to_owned();
        if title.is_empty() {
            return Err(Error::validation("title must not be empty"));
        }

        Ok(Self {
            id: TaskId::new(),
            title,
            description: normalize_optional(description),
            status,
            priority,
            due_date,
            assigned_to: normalize_optional(assigned_to),
            shared_with: dedup_preserving_order(shared_with),
            created_at: now,
            updated_at: now,
            user_id,
        })
    }

    /// Merge the provided fields onto this task and refresh `updated_at`.
    ///
    /// Unspecified fields are retained. The refreshed stamp is strictly
    /// larger than the previous one even when the wall clock has not advanced
    /// between successive edits.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when a provided title is blank.
    pub fn apply(&mut self, changes: TaskChanges, now: OffsetDateTime) -> Result<()> {
        let TaskChanges {
            title,
            description,
            status,
            priority,
            due_date,
            assigned_to,
            shared_with,
        } = changes;

        if let Some(title) = title {
            let title = title.trim().to_owned();
            if title.is_empty() {
                return Err(Error::validation("title must not be empty"));
            }
            self.title = title;
        }
        if let Some(patch) = description {
            self.description = normalize_optional(patch.into_option());
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        if let Some(patch) = due_date {
            self.due_date = patch.into_option();
        }
        if let Some(patch) = assigned_to {
            self.assigned_to = normalize_optional(patch.into_option());
        }
        if let Some(shared) = shared_with {
            self.shared_with = dedup_preserving_order(shared);
        }

        self.touch(now);
        Ok(())
    }

    /// True when the task has a deadline in the past and is not completed.
    #[must_use]
    pub fn is_overdue(&self, now: OffsetDateTime) -> bool {
        self.status != TaskStatus::Completed && self.due_date.is_some_and(|due| due < now)
    }

    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::NANOSECOND
        };
    }
}

/// User-submitted payload for creating a task.
#[derive(Clone, Debug)]
pub struct TaskDraft {
    /// Display title, required.
    pub title: String,
    /// Optional free-text body; blank strings normalize to `None`.
    pub description: Option<String>,
    /// Initial status, `Pending` when the form leaves it unspecified.
    pub status: TaskStatus,
    /// Initial priority, `Medium` when the form leaves it unspecified.
    pub priority: TaskPriority,
    /// Optional deadline.
    pub due_date: Option<OffsetDateTime>,
    /// Optional responsible party.
    pub assigned_to: Option<String>,
    /// Read-visibility list; duplicates are dropped on creation.
    pub shared_with: Vec<String>,
}

impl TaskDraft {
    /// Draft with the given title and the form defaults for everything else.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            assigned_to: None,
            shared_with: Vec::new(),
        }
    }
}

/// Patch for a clearable field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Patch<T> {
    /// Replace the field with the provided value.
    Set(T),
    /// Clear the field entirely.
    Clear,
}

impl<T> Patch<T> {
    /// The resulting field value.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }
}

/// Merge patch applied by `update`; every field is optional and unspecified
/// fields are retained.
#[derive(Clone, Debug, Default)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<String>,
    /// Description patch.
    pub description: Option<Patch<String>>,
    /// Replacement status.
    pub status: Option<TaskStatus>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Deadline patch.
    pub due_date: Option<Patch<OffsetDateTime>>,
    /// Assignee patch.
    pub assigned_to: Option<Patch<String>>,
    /// Replacement read-visibility list.
    pub shared_with: Option<Vec<String>>,
}

impl TaskChanges {
    /// Patch that only moves the task to `status`.
    #[must_use]
    pub fn status_only(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// True when applying the patch would change nothing but `updated_at`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.assigned_to.is_none()
            && self.shared_with.is_none()
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn owner() -> UserId {
        UserId::new()
    }

    #[test]
    fn create_sets_equal_timestamps_and_owner() {
        let now = datetime!(2025-07-01 09:00 UTC);
        let user = owner();
        let task = Task::create(TaskDraft::new("Write spec"), user, now).expect("create task");

        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(task.user_id, user);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
    }

    #[test]
    fn create_rejects_blank_titles() {
        let now = datetime!(2025-07-01 09:00 UTC);
        let result = Task::create(TaskDraft::new("   "), owner(), now);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn create_normalizes_description_and_shared_list() {
        let now = datetime!(2025-07-01 09:00 UTC);
        let draft = TaskDraft {
            description: Some("  ".into()),
            shared_with: vec!["jane@example.com".into(), "bob@example.com".into(), "jane@example.com".into()],
            ..TaskDraft::new("Review")
        };
        let task = Task::create(draft, owner(), now).expect("create task");

        assert_eq!(task.description, None);
        assert_eq!(task.shared_with, vec!["jane@example.com", "bob@example.com"]);
    }

    #[test]
    fn apply_merges_and_retains_unspecified_fields() {
        let now = datetime!(2025-07-01 09:00 UTC);
        let draft = TaskDraft {
            description: Some("body".into()),
            assigned_to: Some("john@example.com".into()),
            ..TaskDraft::new("Original")
        };
        let mut task = Task::create(draft, owner(), now).expect("create task");

        let changes = TaskChanges {
            title: Some("Renamed".into()),
            priority: Some(TaskPriority::High),
            ..TaskChanges::default()
        };
        task.apply(changes, datetime!(2025-07-02 09:00 UTC)).expect("apply changes");

        assert_eq!(task.title, "Renamed");
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.description.as_deref(), Some("body"));
        assert_eq!(task.assigned_to.as_deref(), Some("john@example.com"));
        assert_eq!(task.updated_at, datetime!(2025-07-02 09:00 UTC));
    }

    #[test]
    fn apply_clears_fields_through_patches() {
        let now = datetime!(2025-07-01 09:00 UTC);
        let draft = TaskDraft {
            description: Some("body".into()),
            due_date: Some(datetime!(2025-07-05 00:00 UTC)),
            ..TaskDraft::new("Task")
        };
        let mut task = Task::create(draft, owner(), now).expect("create task");

        let changes = TaskChanges {
            description: Some(Patch::Clear),
            due_date: Some(Patch::Clear),
            ..TaskChanges::default()
        };
        task.apply(changes, datetime!(2025-07-02 09:00 UTC)).expect("apply changes");

        assert_eq!(task.description, None);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn updated_at_strictly_increases_even_within_one_clock_tick() {
        let now = datetime!(2025-07-01 09:00 UTC);
        let mut task = Task::create(TaskDraft::new("Task"), owner(), now).expect("create task");

        let before = task.updated_at;
        task.apply(TaskChanges::status_only(TaskStatus::InProgress), now)
            .expect("apply changes");
        assert!(task.updated_at > before);

        let before = task.updated_at;
        task.apply(TaskChanges::status_only(TaskStatus::Completed), now)
            .expect("apply changes");
        assert!(task.updated_at > before);
        assert!(task.updated_at >= task.created_at);
    }

    #[test]
    fn overdue_requires_past_deadline_and_open_status() {
        let now = datetime!(2025-07-07 12:00 UTC);
        let draft = TaskDraft {
            due_date: Some(datetime!(2025-07-04 00:00 UTC)),
            ..TaskDraft::new("Deploy")
        };
        let mut task = Task::create(draft, owner(), datetime!(2025-07-01 09:00 UTC)).expect("create task");

        assert!(task.is_overdue(now));
        task.apply(TaskChanges::status_only(TaskStatus::Completed), now)
            .expect("apply changes");
        assert!(!task.is_overdue(now));

        let undated = Task::create(TaskDraft::new("No deadline"), owner(), now).expect("create task");
        assert!(!undated.is_overdue(now));
    }

    #[test]
    fn status_tokens_parse_from_user_input() {
        assert_eq!("In-Progress".parse::<TaskStatus>().expect("parse status"), TaskStatus::InProgress);
        assert_eq!("done".parse::<TaskStatus>().expect("parse status"), TaskStatus::Completed);
        assert!("paused".parse::<TaskStatus>().is_err());
        assert_eq!("HIGH".parse::<TaskPriority>().expect("parse priority"), TaskPriority::High);
    }
}
