//! Asynchronous authentication service wrapping the pure state machine.
//!
//! The service owns the current [`AuthPhase`], a user directory, and a
//! session store. Every operation dispatches events through
//! [`taskstream_core::transition`] and executes the persistence action the
//! transition returns; the service itself never decides what to persist.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::sleep;

use taskstream_core::{
    AuthEvent, AuthPhase, Error, LoginCredentials, PersistAction, Provider, Result,
    SignupCredentials, User, UserId, transition,
};

use crate::directory::UserDirectory;
use crate::notice::{Notice, NoticeSink};
use crate::session_store::SessionStore;

/// The one password the mock directory accepts, standing in for the hash
/// verification a real backend would do.
const MOCK_PASSWORD: &str = "password";

/// External message shared by both login rejection causes. The distinct
/// causes stay in the returned error for logging and tests.
const GENERIC_LOGIN_FAILURE: &str = "Invalid email or password";

const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);
const DEFAULT_PROVIDER_LATENCY: Duration = Duration::from_millis(1500);

/// Authentication service over a user directory and a session store.
pub struct AuthService<D, S> {
    directory: D,
    sessions: S,
    notices: Arc<dyn NoticeSink>,
    latency: Duration,
    provider_latency: Duration,
    phase: Mutex<AuthPhase>,
    in_flight: AtomicBool,
}

impl<D: UserDirectory, S: SessionStore> AuthService<D, S> {
    /// Service with the default simulated latencies.
    pub fn new(directory: D, sessions: S, notices: Arc<dyn NoticeSink>) -> Self {
        Self {
            directory,
            sessions,
            notices,
            latency: DEFAULT_LATENCY,
            provider_latency: DEFAULT_PROVIDER_LATENCY,
            phase: Mutex::new(AuthPhase::Uninitialized),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Override the simulated latencies (tests pass zero).
    #[must_use]
    pub fn with_latency(mut self, latency: Duration, provider_latency: Duration) -> Self {
        self.latency = latency;
        self.provider_latency = provider_latency;
        self
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        lock(&self.phase).clone()
    }

    /// The active user, when authenticated.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        lock(&self.phase).user().cloned()
    }

    /// True while a session is active.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        lock(&self.phase).is_authenticated()
    }

    /// Restore the persisted session on startup.
    ///
    /// A missing or corrupt session blob restores to `Unauthenticated`; only
    /// a store that cannot be read at all is an error.
    ///
    /// # Errors
    /// Returns an error when the session store is unreadable.
    pub fn initialize(&self) -> Result<AuthPhase> {
        let restored = self.sessions.load()?;
        self.apply(AuthEvent::Restored(restored))
    }

    /// Verify credentials against the directory and open a session.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] for an unknown email, [`Error::AuthFailed`]
    /// for a wrong password (both surfaced to the user with one generic
    /// message), or [`Error::OperationInFlight`] when another operation is
    /// still running.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<User> {
        let _guard = self.begin()?;
        self.apply(AuthEvent::Started)?;
        sleep(self.latency).await;

        match self.verify(&credentials) {
            Ok(user) => {
                self.apply(AuthEvent::Succeeded(user.clone()))?;
                self.notices.notify(Notice::info(
                    "Welcome back!",
                    format!("Successfully logged in as {}", user.name),
                ));
                Ok(user)
            }
            Err(err) => {
                self.apply(AuthEvent::Failed)?;
                self.notices
                    .notify(Notice::destructive("Login failed", GENERIC_LOGIN_FAILURE));
                tracing::debug!(cause = %err, "login rejected");
                Err(err)
            }
        }
    }

    /// Register a new account and open a session for it.
    ///
    /// Field validation runs before anything else, so a bad form never
    /// touches the directory or the machine state.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for bad form input,
    /// [`Error::Conflict`] when the email is already registered, or
    /// [`Error::OperationInFlight`] when another operation is still running.
    pub async fn signup(&self, credentials: SignupCredentials) -> Result<User> {
        credentials.validate()?;

        let _guard = self.begin()?;
        self.apply(AuthEvent::Started)?;
        sleep(self.latency).await;

        if self.directory.find_by_email(&credentials.email).is_some() {
            self.apply(AuthEvent::Failed)?;
            self.notices.notify(Notice::destructive(
                "Signup failed",
                "An account with this email already exists",
            ));
            return Err(Error::conflict(format!(
                "email already registered: {}",
                credentials.email
            )));
        }

        let user = User {
            id: UserId::new(),
            email: credentials.email,
            name: credentials.name.trim().to_owned(),
            avatar: None,
            created_at: OffsetDateTime::now_utc(),
        };
        self.directory.insert(user.clone());
        self.apply(AuthEvent::Succeeded(user.clone()))?;
        self.notices.notify(Notice::info(
            "Account created!",
            format!("Welcome to TaskStream, {}!", user.name),
        ));
        Ok(user)
    }

    /// Simulated OAuth round trip; always succeeds with a synthesized user.
    ///
    /// # Errors
    /// Returns [`Error::OperationInFlight`] when another operation is still
    /// running, or a storage error when persisting the session fails.
    pub async fn login_with_provider(&self, provider: Provider) -> Result<User> {
        let _guard = self.begin()?;
        self.apply(AuthEvent::Started)?;
        sleep(self.provider_latency).await;

        let user = provider_user(provider, OffsetDateTime::now_utc());
        self.apply(AuthEvent::Succeeded(user.clone()))?;
        self.notices.notify(Notice::info(
            "Welcome!",
            format!("Successfully logged in with {}", provider.label()),
        ));
        Ok(user)
    }

    /// End the session, clearing both in-memory and durable state.
    ///
    /// # Errors
    /// Returns an error when the session store cannot be written.
    pub fn logout(&self) -> Result<()> {
        self.apply(AuthEvent::LoggedOut)?;
        self.notices.notify(Notice::info(
            "Logged out",
            "You have been successfully logged out",
        ));
        Ok(())
    }

    /// Dispatch one event: compute the transition, execute its persistence
    /// action, and commit the next phase.
    fn apply(&self, event: AuthEvent) -> Result<AuthPhase> {
        let mut phase = lock(&self.phase);
        let outcome = transition(phase.clone(), event);
        if let Some(action) = outcome.persist {
            let result = match action {
                PersistAction::Store(ref user) => self.sessions.save(user),
                PersistAction::Clear => self.sessions.clear(),
            };
            if let Err(err) = result {
                // The machine must never rest in Loading, even when the
                // store write fails under it.
                *phase = AuthPhase::Unauthenticated;
                return Err(err);
            }
        }
        *phase = outcome.next.clone();
        Ok(outcome.next)
    }

    fn verify(&self, credentials: &LoginCredentials) -> Result<User> {
        let user = self
            .directory
            .find_by_email(&credentials.email)
            .ok_or_else(|| Error::not_found(format!("no account for {}", credentials.email)))?;
        if credentials.password != MOCK_PASSWORD {
            return Err(Error::AuthFailed);
        }
        Ok(user)
    }

    fn begin(&self) -> Result<InFlight<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::OperationInFlight);
        }
        Ok(InFlight(&self.in_flight))
    }
}

/// Clears the in-flight flag when the owning operation finishes, including
/// early returns.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Deterministic user synthesized for a social login.
fn provider_user(provider: Provider, now: OffsetDateTime) -> User {
    let avatar = match provider {
        Provider::Google => {
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=32&h=32&fit=crop&crop=face"
        }
        Provider::Github => {
            "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=32&h=32&fit=crop&crop=face"
        }
    };
    User {
        id: UserId::new(),
        email: format!("user@{}.com", provider.token()),
        name: format!("{} User", provider.label()),
        avatar: Some(avatar.to_owned()),
        created_at: now,
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
