//! Optional on-disk configuration.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration loaded from `config.toml` in the data directory.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Tunables for the simulated authentication backend.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from the given data directory.
    ///
    /// A missing file yields the defaults; a file that does not parse is an
    /// error, since silently ignoring a typo'd config would be worse.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let config_path = data_dir.as_ref().join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        Ok(config)
    }
}

/// Simulated latency settings for the mock authentication backend.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Delay applied to login and signup, in milliseconds.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Delay applied to the social-login round trip, in milliseconds.
    #[serde(default = "default_provider_latency_ms")]
    pub provider_latency_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            provider_latency_ms: default_provider_latency_ms(),
        }
    }
}

impl AuthConfig {
    /// Login/signup delay as a [`Duration`].
    #[must_use]
    pub const fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Social-login delay as a [`Duration`].
    #[must_use]
    pub const fn provider_latency(&self) -> Duration {
        Duration::from_millis(self.provider_latency_ms)
    }
}

const fn default_latency_ms() -> u64 {
    1000
}

const fn default_provider_latency_ms() -> u64 {
    1500
}
