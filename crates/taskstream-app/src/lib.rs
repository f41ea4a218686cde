//! Application layer for taskstream.
//!
//! This crate provides the services and storage adapters around
//! `taskstream-core`: the task board, the async authentication service, the
//! session and board stores, the mock user directory, notices, and
//! configuration.

pub mod auth;
pub mod board;
pub mod board_store;
pub mod config;
pub mod directory;
pub mod notice;
pub mod sample;
pub mod session_store;

// Re-exports for convenience
pub use auth::AuthService;
pub use board::TaskBoard;
pub use board_store::{BoardStore, FileBoardStore};
pub use config::{AppConfig, AuthConfig};
pub use directory::{MemoryDirectory, UserDirectory};
pub use notice::{LogSink, Notice, NoticeSink, RecordingSink, Severity};
pub use sample::demo_tasks;
pub use session_store::{FileSessionStore, MemorySessionStore, SESSION_KEY, SessionStore};
