//! User identity, login/signup credentials, and signup validation.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::id::UserId;

/// Authenticated identity, persisted across restarts while a session is active.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Optional avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// When the account was registered.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Social login providers supported by the simulated OAuth flow.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google OAuth.
    Google,
    /// GitHub OAuth.
    Github,
}

impl Provider {
    /// Capitalized name used in greetings and synthesized display names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Github => "Github",
        }
    }

    /// Lowercase token used in synthesized emails.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::Github),
            other => Err(Error::validation(format!("unknown provider: {other}"))),
        }
    }
}

/// Credentials submitted by the login form.
#[derive(Clone, Debug)]
pub struct LoginCredentials {
    /// Login email.
    pub email: String,
    /// Plain-text password (the mock directory accepts one fixed value).
    pub password: String,
}

/// Credentials submitted by the signup form.
#[derive(Clone, Debug)]
pub struct SignupCredentials {
    /// Display name for the new account.
    pub name: String,
    /// Login email for the new account.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Repeated password, must match.
    pub confirm_password: String,
}

impl SignupCredentials {
    /// Field-level validation, enforced here so the auth service never relies
    /// on its callers having validated the form.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] naming the first failing field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().chars().count() < 2 {
            return Err(Error::validation("name must be at least 2 characters"));
        }
        if !looks_like_email(&self.email) {
            return Err(Error::validation("invalid email address"));
        }
        if self.password.chars().count() < 6 {
            return Err(Error::validation("password must be at least 6 characters"));
        }
        if self.password != self.confirm_password {
            return Err(Error::validation("passwords do not match"));
        }
        Ok(())
    }
}

/// Loose email shape check: one `@`, a non-empty local part, and a dotted domain.
fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.') && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> SignupCredentials {
        SignupCredentials {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[test]
    fn valid_signup_passes() {
        assert!(credentials().validate().is_ok());
    }

    #[test]
    fn short_name_is_rejected() {
        let creds = SignupCredentials {
            name: "A".into(),
            ..credentials()
        };
        let Err(Error::Validation(msg)) = creds.validate() else {
            panic!("expected validation error");
        };
        assert!(msg.contains("name"));
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["", "alice", "@example.com", "alice@", "alice@example", "alice@.com", "alice@com."] {
            let creds = SignupCredentials {
                email: email.into(),
                ..credentials()
            };
            assert!(creds.validate().is_err(), "{email} should be rejected");
        }
    }

    #[test]
    fn short_password_is_rejected() {
        let creds = SignupCredentials {
            password: "abc".into(),
            confirm_password: "abc".into(),
            ..credentials()
        };
        let Err(Error::Validation(msg)) = creds.validate() else {
            panic!("expected validation error");
        };
        assert!(msg.contains("password"));
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let creds = SignupCredentials {
            confirm_password: "different".into(),
            ..credentials()
        };
        let Err(Error::Validation(msg)) = creds.validate() else {
            panic!("expected validation error");
        };
        assert!(msg.contains("match"));
    }

    #[test]
    fn provider_tokens_parse_case_insensitively() {
        let parsed: Provider = " GitHub ".parse().expect("must parse provider");
        assert_eq!(parsed, Provider::Github);
        assert!("gitlab".parse::<Provider>().is_err());
    }
}
