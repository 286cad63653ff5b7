//! Configuration file handling.
//!
//! This module provides loading and saving of auditfmt configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/auditfmt/config.toml`
//! - macOS: `~/Library/Application Support/auditfmt/config.toml`
//! - Windows: `%APPDATA%\auditfmt\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! quiet = false
//! color = true
//! default_format = "text"
//! ecosystem_prefix = "pkg:gem/"
//!
//! [ignore]
//! packages = ["pkg:gem/rake@*"]
//! vulnerabilities = ["CVE-2021-12345"]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::model::{AuditRecord, GEM_PREFIX};

/// Application configuration.
///
/// Command line flags take precedence over these values.
///
/// # Example
///
/// ```no_run
/// use auditfmt::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Quiet: {}", config.quiet);
/// println!("Prefix: {}", config.ecosystem_prefix);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hide the report header and packages without vulnerabilities.
    ///
    /// Default: false
    pub quiet: bool,

    /// Color the text report.
    ///
    /// Default: true
    pub color: bool,

    /// Output format when no `--format` flag is provided.
    ///
    /// Valid values: "text", "json"
    /// Default: "text"
    pub default_format: String,

    /// Prefix stripped from coordinates before splitting name and version.
    ///
    /// Default: "pkg:gem/"
    pub ecosystem_prefix: String,

    /// Ignore list configuration for suppressing known issues.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Configuration for ignoring specific packages or vulnerabilities.
///
/// Use this to suppress known false positives or accepted risks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Coordinates to drop from the report.
    ///
    /// Supports glob patterns (e.g., "pkg:gem/rake@*").
    pub packages: Vec<String>,

    /// Vulnerability IDs to ignore (e.g., "CVE-2021-12345").
    ///
    /// A package whose vulnerabilities are all ignored is reported as clean.
    pub vulnerabilities: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a package should be ignored.
    pub fn should_ignore_package(&self, coordinates: &str) -> bool {
        self.packages.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, coordinates)
            } else {
                pattern == coordinates
            }
        })
    }

    /// Check if a vulnerability should be ignored.
    pub fn should_ignore_vulnerability(&self, vuln_id: &str) -> bool {
        self.vulnerabilities.iter().any(|id| id == vuln_id)
    }

    /// Removes ignored packages and vulnerabilities from the audit results.
    pub fn apply(&self, records: Vec<AuditRecord>) -> Vec<AuditRecord> {
        let before = records.len();
        let kept: Vec<AuditRecord> = records
            .into_iter()
            .filter(|r| !self.should_ignore_package(&r.coordinates))
            .map(|mut r| {
                r.vulnerabilities
                    .retain(|_, v| !self.should_ignore_vulnerability(&v.id));
                r
            })
            .collect();

        if kept.len() != before {
            debug!(ignored = before - kept.len(), "dropped ignored packages");
        }
        kept
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    if !parts[0].is_empty() {
        if !remaining.starts_with(parts[0]) {
            return false;
        }
        remaining = &remaining[parts[0].len()..];
    }

    let last_part = parts[parts.len() - 1];
    if !last_part.is_empty() {
        if !remaining.ends_with(last_part) {
            return false;
        }
        remaining = &remaining[..remaining.len() - last_part.len()];
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        if let Some(pos) = remaining.find(part) {
            remaining = &remaining[pos + part.len()..];
        } else {
            return false;
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiet: false,
            color: true,
            default_format: "text".to_string(),
            ecosystem_prefix: GEM_PREFIX.to_string(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`, falling back to defaults when it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Saves the configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Saves the configuration to `path`, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use auditfmt::Config;
    ///
    /// let path = Config::config_path();
    /// println!("Config file: {}", path.display());
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("auditfmt")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
