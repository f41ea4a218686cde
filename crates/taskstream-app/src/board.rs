//! Task board: owns the task collection and applies mutations.

use std::sync::Arc;

use time::OffsetDateTime;

use taskstream_core::{
    BoardStats, Error, QuickFilter, Result, Task, TaskChanges, TaskDraft, TaskId, TaskStatus, UserId,
    filter_tasks,
};

use crate::notice::{Notice, NoticeSink};

/// Single-user collection of tasks, newest first, with a notice sink that is
/// told about every mutation.
pub struct TaskBoard {
    tasks: Vec<Task>,
    owner: UserId,
    notices: Arc<dyn NoticeSink>,
}

impl TaskBoard {
    /// Empty board owned by `owner`.
    #[must_use]
    pub const fn new(owner: UserId, notices: Arc<dyn NoticeSink>) -> Self {
        Self {
            tasks: Vec::new(),
            owner,
            notices,
        }
    }

    /// Board pre-populated with previously persisted tasks.
    #[must_use]
    pub const fn with_tasks(tasks: Vec<Task>, owner: UserId, notices: Arc<dyn NoticeSink>) -> Self {
        Self { tasks, owner, notices }
    }

    /// The full collection in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Identity that owns newly created tasks.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Create a task from a form draft and prepend it to the collection.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when the draft title is blank.
    pub fn create(&mut self, draft: TaskDraft) -> Result<&Task> {
        let task = Task::create(draft, self.owner, OffsetDateTime::now_utc())?;
        self.tasks.insert(0, task);
        self.notices.notify(Notice::info(
            "Task created",
            "Your task has been created successfully.",
        ));
        Ok(&self.tasks[0])
    }

    /// Merge `changes` onto the task with the given id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when no task has that id, or
    /// [`Error::Validation`] when the patch carries a blank title.
    pub fn update(&mut self, id: TaskId, changes: TaskChanges) -> Result<&Task> {
        let index = self.index_of(id)?;
        self.tasks[index].apply(changes, OffsetDateTime::now_utc())?;
        self.notices.notify(Notice::info(
            "Task updated",
            "Your task has been updated successfully.",
        ));
        Ok(&self.tasks[index])
    }

    /// Remove the task with the given id. Unknown ids are a silent no-op, so
    /// repeated deletion is safe.
    pub fn delete(&mut self, id: TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() < before {
            self.notices.notify(Notice::destructive(
                "Task deleted",
                "Your task has been deleted successfully.",
            ));
        }
    }

    /// Move the task with the given id to `status`, refreshing `updated_at`.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when no task has that id.
    pub fn change_status(&mut self, id: TaskId, status: TaskStatus) -> Result<&Task> {
        let index = self.index_of(id)?;
        self.tasks[index].apply(TaskChanges::status_only(status), OffsetDateTime::now_utc())?;
        self.notices.notify(Notice::info(
            "Task updated",
            format!("Task status changed to {status}."),
        ));
        Ok(&self.tasks[index])
    }

    /// Derive the view matching the search term and quick filter.
    #[must_use]
    pub fn search(&self, search_term: &str, filter: QuickFilter) -> Vec<Task> {
        filter_tasks(&self.tasks, search_term, filter, OffsetDateTime::now_utc())
    }

    /// Aggregate counts for the whole board.
    #[must_use]
    pub fn stats(&self) -> BoardStats {
        BoardStats::collect(&self.tasks, OffsetDateTime::now_utc())
    }

    /// Look a task up by id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] when no task has that id.
    pub fn get(&self, id: TaskId) -> Result<&Task> {
        Ok(&self.tasks[self.index_of(id)?])
    }

    fn index_of(&self, id: TaskId) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| Error::not_found(format!("task {id}")))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::notice::RecordingSink;
    use std::collections::HashSet;

    fn board() -> (TaskBoard, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let board = TaskBoard::new(UserId::new(), Arc::clone(&sink) as Arc<dyn NoticeSink>);
        (board, sink)
    }

    #[test]
    fn created_tasks_are_prepended_with_fresh_ids() {
        let (mut board, sink) = board();
        board.create(TaskDraft::new("first")).expect("create first");
        board.create(TaskDraft::new("second")).expect("create second");

        assert_eq!(board.tasks()[0].title, "second");
        assert_eq!(board.tasks()[1].title, "first");

        let ids: HashSet<TaskId> = board.tasks().iter().map(|task| task.id).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(sink.titles(), vec!["Task created", "Task created"]);

        for task in board.tasks() {
            assert_eq!(task.created_at, task.updated_at);
            assert_eq!(task.user_id, board.owner());
        }
    }

    #[test]
    fn blank_title_is_rejected_without_mutation() {
        let (mut board, sink) = board();
        assert!(matches!(board.create(TaskDraft::new("  ")), Err(Error::Validation(_))));
        assert!(board.tasks().is_empty());
        assert!(sink.titles().is_empty());
    }

    #[test]
    fn update_refreshes_only_named_fields() {
        let (mut board, _sink) = board();
        let id = board.create(TaskDraft::new("Write spec")).expect("create").id;
        let before = board.get(id).expect("get").updated_at;

        let changes = TaskChanges {
            title: Some("Write the spec".into()),
            ..TaskChanges::default()
        };
        let updated = board.update(id, changes).expect("update");

        assert_eq!(updated.title, "Write the spec");
        assert_eq!(updated.status, TaskStatus::Pending);
        assert!(updated.updated_at > before);
    }

    #[test]
    fn update_of_unknown_id_reports_not_found() {
        let (mut board, _sink) = board();
        let result = board.update(TaskId::new(), TaskChanges::default());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn delete_is_idempotent() {
        let (mut board, sink) = board();
        let id = board.create(TaskDraft::new("victim")).expect("create").id;

        board.delete(id);
        assert!(board.tasks().is_empty());

        // Deleting again must not alter the collection or emit another notice.
        board.delete(id);
        assert!(board.tasks().is_empty());
        assert_eq!(
            sink.titles().iter().filter(|title| *title == "Task deleted").count(),
            1
        );
    }

    #[test]
    fn change_status_moves_between_filter_buckets() {
        let (mut board, _sink) = board();
        let id = board.create(TaskDraft::new("Write spec")).expect("create").id;

        assert_eq!(board.search("", QuickFilter::Pending).len(), 1);
        assert!(board.search("", QuickFilter::Completed).is_empty());

        board.change_status(id, TaskStatus::Completed).expect("change status");

        assert!(board.search("", QuickFilter::Pending).is_empty());
        assert_eq!(board.search("", QuickFilter::Completed).len(), 1);
        // A task with no due date never shows up as overdue, completed or not.
        assert!(board.search("", QuickFilter::Overdue).is_empty());
    }

    #[test]
    fn search_and_stats_reflect_the_board() {
        let (mut board, _sink) = board();
        let draft = TaskDraft {
            description: Some("collect review notes".into()),
            ..TaskDraft::new("Prepare meeting")
        };
        board.create(draft).expect("create");
        let done = board.create(TaskDraft::new("Ship release")).expect("create").id;
        board.change_status(done, TaskStatus::Completed).expect("change status");

        assert_eq!(board.search("REVIEW", QuickFilter::All).len(), 1);
        assert_eq!(board.search("", QuickFilter::All).len(), 2);

        let stats = board.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.completion_rate, 50);
    }
}
