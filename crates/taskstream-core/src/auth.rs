//! Authentication state machine: phases, events, and the pure transition.
//!
//! The transition function performs no I/O. Side effects on the durable
//! session store are returned as [`PersistAction`] data and executed by a
//! thin adapter, which keeps every transition testable without a storage
//! backend.

use crate::user::User;

/// Phase of the authentication lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthPhase {
    /// The persisted session has not been restored yet.
    #[default]
    Uninitialized,
    /// An asynchronous operation is running.
    Loading,
    /// A session is active.
    Authenticated(User),
    /// No session.
    Unauthenticated,
}

impl AuthPhase {
    /// The active user, when authenticated.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// True when a session is active. Holds exactly when [`Self::user`] is `Some`.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// True for the two resting phases every operation must end in.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Authenticated(_) | Self::Unauthenticated)
    }
}

/// Events driving phase transitions.
#[derive(Clone, Debug)]
pub enum AuthEvent {
    /// Outcome of restoring the persisted session at startup.
    Restored(Option<User>),
    /// An asynchronous operation began.
    Started,
    /// The running operation produced an authenticated user.
    Succeeded(User),
    /// The running operation failed.
    Failed,
    /// The user ended the session.
    LoggedOut,
}

/// Durable-store side effect requested by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersistAction {
    /// Write the user under the session key.
    Store(User),
    /// Remove the session key.
    Clear,
}

/// Next phase plus the persistence side effect to execute, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Phase to move into.
    pub next: AuthPhase,
    /// Side effect the adapter must apply to the durable store.
    pub persist: Option<PersistAction>,
}

impl Transition {
    const fn to(next: AuthPhase) -> Self {
        Self { next, persist: None }
    }
}

/// Compute the transition for `event` arriving in `phase`.
///
/// `Succeeded` and `Failed` are only meaningful while `Loading`; arriving in
/// any other phase they are stale resolutions of an operation that no longer
/// owns the state, and leave the phase untouched.
#[must_use]
pub fn transition(phase: AuthPhase, event: AuthEvent) -> Transition {
    match event {
        AuthEvent::Restored(Some(user)) => Transition::to(AuthPhase::Authenticated(user)),
        AuthEvent::Restored(None) => Transition::to(AuthPhase::Unauthenticated),
        AuthEvent::Started => Transition::to(AuthPhase::Loading),
        AuthEvent::Succeeded(user) => {
            if phase == AuthPhase::Loading {
                Transition {
                    next: AuthPhase::Authenticated(user.clone()),
                    persist: Some(PersistAction::Store(user)),
                }
            } else {
                Transition::to(phase)
            }
        }
        AuthEvent::Failed => {
            if phase == AuthPhase::Loading {
                Transition::to(AuthPhase::Unauthenticated)
            } else {
                Transition::to(phase)
            }
        }
        AuthEvent::LoggedOut => Transition {
            next: AuthPhase::Unauthenticated,
            persist: Some(PersistAction::Clear),
        },
    }
}
