//! Search and quick-filter derivation for task lists.

use std::{fmt, str::FromStr};
use time::{Duration, OffsetDateTime, Time};

use crate::error::Error;
use crate::task::{Task, TaskStatus};

/// Categorical filter applied alongside the free-text search.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum QuickFilter {
    /// No restriction.
    #[default]
    All,
    /// Due within the calendar day of `now`.
    Today,
    /// Deadline in the past and not completed.
    Overdue,
    /// Status is `pending`.
    Pending,
    /// Status is `in-progress`.
    InProgress,
    /// Status is `completed`.
    Completed,
}

impl QuickFilter {
    /// Serialized token, also used for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Overdue => "overdue",
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Whether `task` satisfies this filter at the instant `now`.
    #[must_use]
    pub fn admits(self, task: &Task, now: OffsetDateTime) -> bool {
        match self {
            Self::All => true,
            Self::Pending => task.status == TaskStatus::Pending,
            Self::InProgress => task.status == TaskStatus::InProgress,
            Self::Completed => task.status == TaskStatus::Completed,
            Self::Overdue => task.is_overdue(now),
            Self::Today => task.due_date.is_some_and(|due| {
                // The day window is anchored to the offset `now` was observed in.
                let start = now.replace_time(Time::MIDNIGHT);
                due >= start && due < start + Duration::DAY
            }),
        }
    }
}

impl fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuickFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "overdue" => Ok(Self::Overdue),
            "pending" => Ok(Self::Pending),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(Error::validation(format!("unknown filter: {s}"))),
        }
    }
}

/// Case-insensitive substring matcher for task text fields.
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    /// Determine whether the task's title or description contains the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title)
            || task
                .description
                .as_deref()
                .is_some_and(|description| self.matches_field(description))
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}

/// Derive the subset of `tasks` satisfying both the search term and the
/// quick filter, preserving the original relative order.
///
/// This is a pure function of its inputs and is cheap enough to re-evaluate
/// eagerly on every change for the collection sizes a single board holds.
#[must_use]
pub fn filter_tasks(
    tasks: &[Task],
    search_term: &str,
    filter: QuickFilter,
    now: OffsetDateTime,
) -> Vec<Task> {
    let matcher = TextMatcher::new(search_term);
    tasks
        .iter()
        .filter(|task| matcher.as_ref().is_none_or(|m| m.matches(task)))
        .filter(|task| filter.admits(task, now))
        .cloned()
        .collect()
}
