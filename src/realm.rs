//! The script-backed authentication realm.
//!
//! `authenticate` runs the configured login command with the candidate
//! credentials injected as the `U` and `P` environment variables and decides
//! on the exit status alone; `load_groups` runs the optional groups command
//! and parses its stdout into role names. Both operations are pure functions
//! of the configuration, the call arguments and the ambient environment, so
//! one realm instance serves concurrent login attempts.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::{DEFAULT_GROUPS_DELIMITER, RealmConfig};
use crate::environment;
use crate::error::RealmError;
use crate::process::Script;
use crate::tokenizer;

/// Role granted to every principal that passes the login script.
pub const AUTHENTICATED_ROLE: &str = "authenticated";

/// Environment variable carrying the candidate username.
pub const USERNAME_VAR: &str = "U";
/// Environment variable carrying the candidate password.
pub const PASSWORD_VAR: &str = "P";

/// A successfully authenticated principal and its roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    /// Roles in script output order, starting with [`AUTHENTICATED_ROLE`].
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Script-backed authenticator.
///
/// Holds only immutable configuration; credentials live exactly as long as
/// the call that received them and are never cached.
#[derive(Debug, Clone)]
pub struct ScriptRealm {
    config: RealmConfig,
}

impl ScriptRealm {
    pub fn new(config: RealmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    /// Check the candidate credentials against the login script.
    ///
    /// The script sees the username as `U` and the password as `P`, exactly
    /// as entered - no variable expansion is applied to either. Its stdout
    /// is discarded; only the exit status decides the outcome.
    ///
    /// # Errors
    ///
    /// - [`RealmError::Rejected`] when the script exits non-zero.
    /// - [`RealmError::GroupLookupFailed`] when the login script accepted
    ///   but the configured groups script failed; the login is denied.
    /// - [`RealmError::Service`] when a script could not be launched or
    ///   waited on - a service failure, not bad credentials.
    /// - [`RealmError::MalformedCommandLine`] /
    ///   [`RealmError::MalformedEnvironmentEntry`] for configuration or
    ///   host-environment corruption.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, RealmError> {
        let script = self.script_for(&self.config.command_line)?;

        let mut overrides = HashMap::new();
        overrides.insert(USERNAME_VAR.to_string(), username.to_string());
        overrides.insert(PASSWORD_VAR.to_string(), password.to_string());
        let env = environment::build_environment(environment::inherited_entries(), &overrides)?;

        if self.config.log_credentials {
            // Opt-in only: this line puts the raw credentials in the log.
            debug!(username, password, "running authentication command");
        } else {
            debug!(username, "running authentication command");
        }

        let output = script.env(env).discard_stdout().run()?;

        if !output.success() {
            warn!(
                username,
                code = output.code(),
                "authentication script rejected login"
            );
            return Err(RealmError::Rejected {
                diagnostic: output.stderr_trimmed().to_string(),
            });
        }

        let roles = self.load_groups(username)?;
        Ok(AuthenticatedUser {
            username: username.to_string(),
            roles,
        })
    }

    /// Enumerate roles for an already-trusted identity.
    ///
    /// The result always starts with [`AUTHENTICATED_ROLE`]. With no groups
    /// command configured nothing is executed and only the implicit role is
    /// returned. The groups script receives the username as `U` and no
    /// password; its stdout is split on the configured delimiter, tokens are
    /// trimmed and empty tokens dropped, preserving script order.
    ///
    /// A failing groups script is a hard [`RealmError::GroupLookupFailed`]:
    /// a user whose entitlements cannot be determined is not silently
    /// treated as having zero extra roles.
    pub fn load_groups(&self, username: &str) -> Result<Vec<String>, RealmError> {
        let mut roles = vec![AUTHENTICATED_ROLE.to_string()];

        if !self.config.has_groups_command() {
            return Ok(roles);
        }

        let script = self.script_for(&self.config.groups_command_line)?;

        let mut overrides = HashMap::new();
        overrides.insert(USERNAME_VAR.to_string(), username.to_string());
        let env = environment::build_environment(environment::inherited_entries(), &overrides)?;

        debug!(username, "running groups command");
        let output = script.env(env).run()?;

        if !output.success() {
            warn!(
                username,
                code = output.code(),
                "groups script failed; denying login"
            );
            let diagnostic = if output.stderr_trimmed().is_empty() {
                output.stdout_trimmed().to_string()
            } else {
                output.stderr_trimmed().to_string()
            };
            return Err(RealmError::GroupLookupFailed { diagnostic });
        }

        let delimiter = match self.config.groups_delimiter.as_str() {
            "" => DEFAULT_GROUPS_DELIMITER,
            configured => configured,
        };

        for token in output.stdout_trimmed().split(delimiter) {
            let role = token.trim();
            if role.is_empty() {
                continue;
            }
            debug!(username, role, "granting role");
            roles.push(role.to_string());
        }

        Ok(roles)
    }

    fn script_for(&self, command_line: &str) -> Result<Script, RealmError> {
        let argv = tokenizer::tokenize(command_line)?;
        Script::from_argv(argv)
            .ok_or_else(|| RealmError::MalformedCommandLine(command_line.to_string()))
    }
}
