//! Mock user directory backing the authentication flow.
//!
//! The directory stands in for the user table a real backend would own. It
//! is injectable so tests can substitute their own population without
//! touching process-wide state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use time::macros::datetime;

use taskstream_core::{User, UserId};

/// Lookup and registration surface for the known users.
pub trait UserDirectory: Send + Sync {
    /// Find a user by exact email match.
    fn find_by_email(&self, email: &str) -> Option<User>;

    /// Register a new user. Callers check for duplicates first.
    fn insert(&self, user: User);
}

impl<D: UserDirectory + ?Sized> UserDirectory for std::sync::Arc<D> {
    fn find_by_email(&self, email: &str) -> Option<User> {
        (**self).find_by_email(email)
    }

    fn insert(&self, user: User) {
        (**self).insert(user);
    }
}

/// In-memory directory; registrations live only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: Mutex<Vec<User>>,
}

impl MemoryDirectory {
    /// Empty directory.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Directory seeded with the two demonstration accounts.
    #[must_use]
    pub fn with_demo_users() -> Self {
        Self {
            users: Mutex::new(demo_users()),
        }
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        guard(&self.users).len()
    }

    /// True when no users are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        guard(&self.users).is_empty()
    }
}

impl UserDirectory for MemoryDirectory {
    fn find_by_email(&self, email: &str) -> Option<User> {
        guard(&self.users).iter().find(|user| user.email == email).cloned()
    }

    fn insert(&self, user: User) {
        guard(&self.users).push(user);
    }
}

/// The two accounts every fresh install knows about.
fn demo_users() -> Vec<User> {
    vec![
        User {
            id: UserId::new(),
            email: "john@example.com".into(),
            name: "John Doe".into(),
            avatar: Some(
                "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=32&h=32&fit=crop&crop=face"
                    .into(),
            ),
            created_at: datetime!(2024-01-01 00:00 UTC),
        },
        User {
            id: UserId::new(),
            email: "jane@example.com".into(),
            name: "Jane Smith".into(),
            avatar: Some(
                "https://images.unsplash.com/photo-1494790108755-2616b772b631?w=32&h=32&fit=crop&crop=face"
                    .into(),
            ),
            created_at: datetime!(2024-01-02 00:00 UTC),
        },
    ]
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
