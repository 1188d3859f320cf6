//! Storefront configuration.
//!
//! Defaults cover everything; an optional TOML file named by
//! `SHIELD_POINT_CONFIG` overrides them, and a few environment variables
//! override the file.
//!
//! ```toml
//! [kiosk]
//! scan_delay_ms = 2000
//! dispense_delay_ms = 3500
//!
//! [notifications]
//! ttl_ms = 3000
//!
//! [advisor]
//! model = "claude-sonnet-4-5-20250929"
//! max_tokens = 1024
//! timeout_secs = 30
//! base_url = "https://api.anthropic.com/v1"
//! ```

use serde::{Deserialize, Serialize};
use shield_point_advisor::{DEFAULT_API_URL, DEFAULT_MODEL};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Names the TOML file to load
pub const CONFIG_PATH_VAR: &str = "SHIELD_POINT_CONFIG";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// An override variable holds an unusable value
    #[error("Invalid value for {var}: {value:?}")]
    InvalidOverride {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Kiosk hardware simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KioskConfig {
    /// Presenting a code → scan result
    pub scan_delay_ms: u64,
    /// Collect → dispensing finished
    pub dispense_delay_ms: u64,
}

impl KioskConfig {
    /// Scan delay as Duration
    #[must_use]
    pub const fn scan_delay(&self) -> Duration {
        Duration::from_millis(self.scan_delay_ms)
    }

    /// Dispense delay as Duration
    #[must_use]
    pub const fn dispense_delay(&self) -> Duration {
        Duration::from_millis(self.dispense_delay_ms)
    }
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            scan_delay_ms: 2000,
            dispense_delay_ms: 3500,
        }
    }
}

/// Toast behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationConfig {
    /// How long a toast stays visible
    pub ttl_ms: u64,
}

impl NotificationConfig {
    /// TTL as Duration
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { ttl_ms: 3000 }
    }
}

/// Hosted advisor settings (the API key comes from `ANTHROPIC_API_KEY`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvisorConfig {
    /// Model to use
    pub model: String,
    /// Maximum tokens per answer
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Messages API base URL
    pub base_url: String,
}

impl AdvisorConfig {
    /// Timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            timeout_secs: 30,
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Complete storefront configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShopConfig {
    /// Kiosk delays
    pub kiosk: KioskConfig,
    /// Toasts
    pub notifications: NotificationConfig,
    /// Product advisor
    pub advisor: AdvisorConfig,
}

impl ShopConfig {
    /// Load from `SHIELD_POINT_CONFIG` (if set) and the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an override is
    /// malformed, or the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file (missing sections and fields take defaults)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
        Self::from_toml(&text)
    }

    /// Parse TOML text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `SHIELD_POINT_*` overrides read through `lookup`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] when a numeric variable does not parse.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let millis = |var: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(var)
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidOverride { var, value })
                })
                .transpose()
        };

        if let Some(ms) = millis("SHIELD_POINT_SCAN_DELAY_MS")? {
            self.kiosk.scan_delay_ms = ms;
        }
        if let Some(ms) = millis("SHIELD_POINT_DISPENSE_DELAY_MS")? {
            self.kiosk.dispense_delay_ms = ms;
        }
        if let Some(ms) = millis("SHIELD_POINT_TOAST_TTL_MS")? {
            self.notifications.ttl_ms = ms;
        }
        if let Some(model) = lookup("SHIELD_POINT_ADVISOR_MODEL") {
            self.advisor.model = model;
        }
        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kiosk.scan_delay_ms == 0 {
            return Err(ConfigError::Validation("kiosk.scan_delay_ms must be > 0".to_string()));
        }
        if self.kiosk.dispense_delay_ms == 0 {
            return Err(ConfigError::Validation(
                "kiosk.dispense_delay_ms must be > 0".to_string(),
            ));
        }
        if self.notifications.ttl_ms == 0 {
            return Err(ConfigError::Validation("notifications.ttl_ms must be > 0".to_string()));
        }
        if self.advisor.model.trim().is_empty() {
            return Err(ConfigError::Validation("advisor.model cannot be empty".to_string()));
        }
        if self.advisor.max_tokens == 0 {
            return Err(ConfigError::Validation("advisor.max_tokens must be > 0".to_string()));
        }
        if self.advisor.timeout_secs == 0 {
            return Err(ConfigError::Validation("advisor.timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }
}
