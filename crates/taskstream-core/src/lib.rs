//! Domain types & pure logic for taskstream.
//!
//! Everything here is free of I/O: the task model and its merge patches, the
//! search/quick-filter derivation, board stat aggregates, and the
//! authentication state machine's transition function. Services in
//! `taskstream-app` drive these types and own the side effects.

/// Authentication phases, events, and the pure transition function.
pub mod auth;
/// Error taxonomy shared across crates.
pub mod error;
/// Search and quick-filter derivation.
pub mod filter;
/// Identifier types.
pub mod id;
/// Board-level stat aggregates.
pub mod stats;
/// Task model, drafts, and merge patches.
pub mod task;
/// User identity and credential types.
pub mod user;

pub use auth::{AuthEvent, AuthPhase, PersistAction, Transition, transition};
pub use error::{Error, Result};
pub use filter::{QuickFilter, TextMatcher, filter_tasks};
pub use id::{TaskId, UserId};
pub use stats::BoardStats;
pub use task::{Patch, Task, TaskChanges, TaskDraft, TaskPriority, TaskStatus};
pub use user::{LoginCredentials, Provider, SignupCredentials, User};
