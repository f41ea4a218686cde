//! Demonstration tasks seeded by `taskstream seed`.

use time::macros::datetime;

use taskstream_core::{Task, TaskId, TaskPriority, TaskStatus, UserId};

/// The three tasks every demo board starts with.
#[must_use]
pub fn demo_tasks(owner: UserId) -> Vec<Task> {
    vec![
        Task {
            id: TaskId::new(),
            title: "Design system documentation".into(),
            description: Some("Create comprehensive design system docs for the team".into()),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: Some(datetime!(2025-07-07 00:00 UTC)),
            assigned_to: Some("john@example.com".into()),
            shared_with: vec!["jane@example.com".into()],
            created_at: datetime!(2025-07-01 00:00 UTC),
            updated_at: datetime!(2025-07-01 00:00 UTC),
            user_id: owner,
        },
        Task {
            id: TaskId::new(),
            title: "Code review for authentication".into(),
            description: Some("Review OAuth implementation and security measures".into()),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: Some(datetime!(2025-07-06 00:00 UTC)),
            assigned_to: Some("jane@example.com".into()),
            shared_with: Vec::new(),
            created_at: datetime!(2025-07-02 00:00 UTC),
            updated_at: datetime!(2025-07-02 00:00 UTC),
            user_id: owner,
        },
        Task {
            id: TaskId::new(),
            title: "Deploy to production".into(),
            description: Some("Final deployment and monitoring setup".into()),
            status: TaskStatus::Completed,
            priority: TaskPriority::High,
            due_date: Some(datetime!(2025-07-04 00:00 UTC)),
            assigned_to: Some("john@example.com".into()),
            shared_with: vec!["jane@example.com".into(), "bob@example.com".into()],
            created_at: datetime!(2025-07-03 00:00 UTC),
            updated_at: datetime!(2025-07-04 00:00 UTC),
            user_id: owner,
        },
    ]
}
