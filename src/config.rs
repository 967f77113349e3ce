//! Configuration management for the realm.
//!
//! Reads configuration from an optional JSON file and environment variables.
//! Environment variables take precedence over the file. The command lines
//! configured here are operator-supplied, not attacker-controlled; they are
//! still validated up front so unbalanced quoting fails at configuration
//! time rather than on the first login.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::RealmError;
use crate::resolver::ResolverSelector;
use crate::tokenizer;

/// Delimiter between role names when the operator leaves it blank.
pub const DEFAULT_GROUPS_DELIMITER: &str = ",";

/// Name of the optional JSON configuration file.
pub const CONFIG_FILE_NAME: &str = "scriptrealm.json";

/// Realm configuration.
#[derive(Debug, Clone)]
pub struct RealmConfig {
    /// Command line of the authentication script. The script receives the
    /// candidate username as `U` and the password as `P` and must exit zero
    /// to accept the login. Its stdout is discarded.
    pub command_line: String,
    /// Command line of the groups script, or blank to disable group lookup.
    /// The script receives `U` only and prints role names to stdout.
    pub groups_command_line: String,
    /// Delimiter between role names in the groups script output.
    pub groups_delimiter: String,
    /// Selector for the host's display-name resolver; passed through
    /// untouched to the host.
    pub name_resolver: ResolverSelector,
    /// Selector for the host's e-mail resolver; passed through untouched.
    pub email_resolver: ResolverSelector,
    /// Allow raw credentials in debug logs.
    ///
    /// Security trade-off: when set, `authenticate` emits one debug line
    /// containing the username and password as entered. Off by default;
    /// enable only where the log sink is trusted.
    pub log_credentials: bool,
}

/// On-disk form of the configuration (all fields optional).
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    command: String,
    #[serde(default)]
    groups_command: String,
    #[serde(default)]
    groups_delimiter: String,
    #[serde(default)]
    name_resolver: String,
    #[serde(default)]
    email_resolver: String,
    #[serde(default)]
    log_credentials: bool,
}

impl RealmConfig {
    /// Create a configuration with just an authentication command; group
    /// lookup disabled, resolvers off, default delimiter.
    pub fn new(command_line: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
            groups_command_line: String::new(),
            groups_delimiter: DEFAULT_GROUPS_DELIMITER.to_string(),
            name_resolver: ResolverSelector::None,
            email_resolver: ResolverSelector::None,
            log_credentials: false,
        }
    }

    /// Load configuration from `scriptrealm.json` (if present) and the
    /// environment.
    ///
    /// Environment variables override file values:
    /// `SCRIPTREALM_COMMAND`, `SCRIPTREALM_GROUPS_COMMAND`,
    /// `SCRIPTREALM_GROUPS_DELIMITER`, `SCRIPTREALM_NAME_RESOLVER`,
    /// `SCRIPTREALM_EMAIL_RESOLVER`, `SCRIPTREALM_LOG_CREDENTIALS`.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let mut file = FileConfig::default();

        let path = base_dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            file = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
        }

        let command_line = env_or("SCRIPTREALM_COMMAND", file.command);
        let groups_command_line = env_or("SCRIPTREALM_GROUPS_COMMAND", file.groups_command);
        let groups_delimiter = env_or("SCRIPTREALM_GROUPS_DELIMITER", file.groups_delimiter);
        let name_resolver = env_or("SCRIPTREALM_NAME_RESOLVER", file.name_resolver);
        let email_resolver = env_or("SCRIPTREALM_EMAIL_RESOLVER", file.email_resolver);
        let log_credentials = match std::env::var("SCRIPTREALM_LOG_CREDENTIALS") {
            Ok(value) => parse_bool(&value),
            Err(_) => file.log_credentials,
        };

        Ok(Self {
            command_line,
            groups_command_line,
            groups_delimiter: normalize_delimiter(groups_delimiter),
            name_resolver: ResolverSelector::parse(&name_resolver),
            email_resolver: ResolverSelector::parse(&email_resolver),
            log_credentials,
        })
    }

    /// True when a groups command is configured.
    pub fn has_groups_command(&self) -> bool {
        !self.groups_command_line.trim().is_empty()
    }

    /// Validate the configured command lines.
    ///
    /// # Errors
    ///
    /// Returns [`RealmError::MalformedCommandLine`] when the authentication
    /// command line (or a configured groups command line) is blank or has
    /// unbalanced quoting.
    pub fn validate(&self) -> std::result::Result<(), RealmError> {
        tokenizer::tokenize(&self.command_line)?;
        if self.has_groups_command() {
            tokenizer::tokenize(&self.groups_command_line)?;
        }
        Ok(())
    }

    /// Print configuration for debugging. Contains no secrets.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  SCRIPTREALM_COMMAND: {}", self.command_line);
        if self.has_groups_command() {
            println!("  SCRIPTREALM_GROUPS_COMMAND: {}", self.groups_command_line);
            println!("  SCRIPTREALM_GROUPS_DELIMITER: {:?}", self.groups_delimiter);
        } else {
            println!("  SCRIPTREALM_GROUPS_COMMAND: (unset, group lookup disabled)");
        }
        println!(
            "  SCRIPTREALM_NAME_RESOLVER: {:?}",
            self.name_resolver.as_config_str()
        );
        println!(
            "  SCRIPTREALM_EMAIL_RESOLVER: {:?}",
            self.email_resolver.as_config_str()
        );
        println!("  SCRIPTREALM_LOG_CREDENTIALS: {}", self.log_credentials);
    }
}

fn env_or(name: &str, fallback: String) -> String {
    std::env::var(name).unwrap_or(fallback)
}

fn normalize_delimiter(raw: String) -> String {
    if raw.is_empty() {
        DEFAULT_GROUPS_DELIMITER.to_string()
    } else {
        raw
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}
