//! Configuration module for postbox.

use serde::Deserialize;
use std::path::Path;

use crate::{PostboxError, Result};

/// Message storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for deposited messages
    /// (`<root>/<domain>/<local>/message_*.eml`).
    #[serde(default = "default_storage_root")]
    pub root: String,
}

fn default_storage_root() -> String {
    "data/mail".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

/// SMTP-side configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// Port the embedding SMTP listener binds.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Host name announced in generated Received headers.
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Domains for which deposits are accepted (compared case-insensitively).
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,
}

fn default_smtp_port() -> u16 {
    2500
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_domains() -> Vec<String> {
    vec!["localhost".to_string()]
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            port: default_smtp_port(),
            hostname: default_hostname(),
            domains: default_domains(),
        }
    }
}

/// IMAP-side configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ImapConfig {
    /// Port the embedding IMAP listener binds.
    #[serde(default = "default_imap_port")]
    pub port: u16,
}

fn default_imap_port() -> u16 {
    1430
}

impl Default for ImapConfig {
    fn default() -> Self {
        Self {
            port: default_imap_port(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Path to the credential table (delimited file with `email` and
    /// `password` columns).
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
}

fn default_credentials_file() -> String {
    "credentials.csv".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_file: default_credentials_file(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/postbox.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Message storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// SMTP-side configuration.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// IMAP-side configuration.
    #[serde(default)]
    pub imap: ImapConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PostboxError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| PostboxError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `POSTBOX_STORAGE_ROOT`: Override the storage root directory
    /// - `POSTBOX_DOMAINS`: Override the accepted domain list (comma-separated)
    /// - `POSTBOX_CREDENTIALS_FILE`: Override the credential table path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("POSTBOX_STORAGE_ROOT") {
            if !root.is_empty() {
                self.storage.root = root;
            }
        }

        if let Ok(domains) = std::env::var("POSTBOX_DOMAINS") {
            let domains: Vec<String> = domains
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
            if !domains.is_empty() {
                self.smtp.domains = domains;
            }
        }

        if let Ok(path) = std::env::var("POSTBOX_CREDENTIALS_FILE") {
            if !path.is_empty() {
                self.auth.credentials_file = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The storage root is empty
    /// - The accepted domain list is empty or contains an empty entry
    pub fn validate(&self) -> Result<()> {
        if self.storage.root.is_empty() {
            return Err(PostboxError::Config(
                "storage root must not be empty".to_string(),
            ));
        }

        if self.smtp.domains.is_empty() {
            return Err(PostboxError::Config(
                "at least one accepted domain is required. \
                 Set smtp.domains in config.toml or via POSTBOX_DOMAINS."
                    .to_string(),
            ));
        }

        if self.smtp.domains.iter().any(|d| d.trim().is_empty()) {
            return Err(PostboxError::Config(
                "accepted domain entries must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
