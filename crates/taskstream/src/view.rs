//! Plain-text rendering for tasks and stats.

use time::format_description::well_known::Rfc3339;

use taskstream_core::{BoardStats, Task};

/// One-line summary of a task.
#[must_use]
pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "{}  {:<11}  {:<6}  {}",
        task.id,
        task.status.as_str(),
        task.priority.as_str(),
        task.title
    );
    if let Some(stamp) = task.due_date.and_then(|due| due.format(&Rfc3339).ok()) {
        line.push_str(&format!("  (due {stamp})"));
    }
    if let Some(assignee) = &task.assigned_to {
        line.push_str(&format!("  @{assignee}"));
    }
    line
}

/// Multi-line stats summary.
#[must_use]
pub fn stats_block(stats: &BoardStats) -> String {
    format!(
        "total: {}\npending: {}\nin-progress: {}\ncompleted: {}\noverdue: {}\ncompletion: {}%\n",
        stats.total,
        stats.pending,
        stats.in_progress,
        stats.completed,
        stats.overdue,
        stats.completion_rate
    )
}
