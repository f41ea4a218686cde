//! Notices surfaced to the user after mutations and auth transitions.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Visual weight of a notice.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    /// Routine confirmation.
    Info,
    /// Failure or destructive outcome.
    Destructive,
}

/// Human-readable notification triple. Purely informational; sinks return
/// nothing to the emitter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notice {
    /// Short headline.
    pub title: String,
    /// One-sentence body.
    pub description: String,
    /// Visual weight.
    pub severity: Severity,
}

impl Notice {
    /// Routine confirmation notice.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    /// Failure or destructive-outcome notice.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Receiver for notices emitted by the board and auth services.
pub trait NoticeSink: Send + Sync {
    /// Deliver one notice.
    fn notify(&self, notice: Notice);
}

/// Sink that forwards notices to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl NoticeSink for LogSink {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => tracing::info!(title = %notice.title, "{}", notice.description),
            Severity::Destructive => {
                tracing::warn!(title = %notice.title, "{}", notice.description);
            }
        }
    }
}

/// Sink that records notices so tests can assert on them.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingSink {
    /// Titles of every notice delivered so far, in order.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        guard(&self.notices).iter().map(|notice| notice.title.clone()).collect()
    }

    /// Drain and return every recorded notice.
    #[must_use]
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *guard(&self.notices))
    }
}

impl NoticeSink for RecordingSink {
    fn notify(&self, notice: Notice) {
        guard(&self.notices).push(notice);
    }
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
