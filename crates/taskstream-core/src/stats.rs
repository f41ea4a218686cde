//! Aggregate counts displayed alongside the board.

use time::OffsetDateTime;

use crate::task::{Task, TaskStatus};

/// Per-status counts, overdue count, and the completion percentage.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BoardStats {
    /// Number of tasks on the board.
    pub total: usize,
    /// Tasks with status `pending`.
    pub pending: usize,
    /// Tasks with status `in-progress`.
    pub in_progress: usize,
    /// Tasks with status `completed`.
    pub completed: usize,
    /// Tasks past their deadline and not completed.
    pub overdue: usize,
    /// Completed share rounded to a whole percent; 0 for an empty board.
    pub completion_rate: u8,
}

impl BoardStats {
    /// Tally the given tasks at the instant `now`.
    #[must_use]
    pub fn collect(tasks: &[Task], now: OffsetDateTime) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
        }
        stats.completion_rate = rounded_percent(stats.completed, stats.total);
        stats
    }
}

/// Integer round-half-up of `part / whole` as a percentage.
fn rounded_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    u8::try_from((part * 100 + whole / 2) / whole).unwrap_or(100)
}
