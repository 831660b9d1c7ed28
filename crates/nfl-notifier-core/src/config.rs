//! Notifier configuration
//!
//! All settings live in a single `config.toml` next to the binary. Every
//! field has a default, so a missing file is a valid (if minimal)
//! configuration; only the `[google]` credentials have no fallback and are
//! validated when publishing is actually attempted.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NotifierError, Result};

/// Default configuration file path
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Default log file path when the config names none
const DEFAULT_LOGGING_PATH: &str = "nfl-notifier.log";

/// Configuration for the NFL notifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Path of the log file
    pub logging_path: Option<PathBuf>,

    /// IANA timezone the events are scheduled in
    pub timezone: String,

    /// Calendar the events are created in
    pub calendar_id: String,

    /// Google OAuth settings
    pub google: GoogleSettings,

    /// HTTP client settings
    pub http: HttpSettings,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            logging_path: None,
            timezone: "Europe/Berlin".to_string(),
            calendar_id: "primary".to_string(),
            google: GoogleSettings::default(),
            http: HttpSettings::default(),
        }
    }
}

/// Google OAuth settings (`[google]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// OAuth client id
    pub client_id: Option<String>,

    /// OAuth client secret
    pub client_secret: Option<String>,

    /// Path of the persisted token JSON
    pub token_file: Option<PathBuf>,
}

impl GoogleSettings {
    /// Resolved client id.
    ///
    /// # Errors
    /// Returns `NotifierError::Config` when the id is missing.
    pub fn resolve_client_id(&self) -> Result<&str> {
        self.client_id.as_deref().ok_or_else(|| {
            NotifierError::Config(
                "client_id is missing from [google] section in config.toml".to_string(),
            )
        })
    }

    /// Resolved client secret.
    ///
    /// # Errors
    /// Returns `NotifierError::Config` when the secret is missing.
    pub fn resolve_client_secret(&self) -> Result<&str> {
        self.client_secret.as_deref().ok_or_else(|| {
            NotifierError::Config(
                "client_secret is missing from [google] section in config.toml".to_string(),
            )
        })
    }

    /// Token file path, defaulting to `token.json`.
    pub fn token_file(&self) -> PathBuf {
        self.token_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("token.json"))
    }
}

/// HTTP client settings (`[http]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl NotifierConfig {
    /// Load the configuration from the default path.
    ///
    /// A missing file yields the default configuration.
    pub fn load() -> Result<Self> {
        Self::load_optional(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load the configuration from `path`, defaulting when the file is absent.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load the configuration from an explicitly named file.
    ///
    /// # Errors
    /// Returns `NotifierError::Config` if the file is missing or malformed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            NotifierError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            NotifierError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Log file path, falling back to the default when unset.
    pub fn logging_path(&self) -> PathBuf {
        self.logging_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGGING_PATH))
    }
}
