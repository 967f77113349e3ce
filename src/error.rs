//! Error taxonomy for the realm.
//!
//! Callers must be able to tell a rejected login apart from an
//! authentication service that could not run at all, so the variants here
//! are matchable rather than stringly-typed. Diagnostics captured from the
//! scripts are for operator logs only and must never be shown to end users.

use std::io;

use thiserror::Error;

/// Errors produced by configuration parsing, script execution and the
/// authentication decision itself.
#[derive(Debug, Error)]
pub enum RealmError {
    /// The configured command line has unbalanced quoting or no tokens.
    #[error("malformed command line: {0:?}")]
    MalformedCommandLine(String),

    /// A raw parent environment entry is missing its `=` separator. This
    /// indicates a corrupted host environment, not bad user input.
    #[error("malformed environment entry: {0:?}")]
    MalformedEnvironmentEntry(String),

    /// The authentication script exited non-zero: bad credentials.
    #[error("authentication script rejected the credentials")]
    Rejected {
        /// Captured script output, for operator logs only.
        diagnostic: String,
    },

    /// The groups script exited non-zero after a successful authentication.
    /// Entitlements could not be determined, so the login is not granted
    /// with the implicit role alone.
    #[error("group lookup failed for authenticated user")]
    GroupLookupFailed {
        /// Captured script output, for operator logs only.
        diagnostic: String,
    },

    /// The script could not be launched or waited on. Surfaces to users as
    /// "authentication service unavailable", never as "bad credentials".
    #[error("authentication service unavailable: {0}")]
    Service(#[from] io::Error),
}

impl RealmError {
    /// True for outcomes a UI should report as "bad credentials". Everything
    /// else is a configuration or service failure.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, RealmError::Rejected { .. })
    }

    /// Operator-facing diagnostic text captured from the script, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            RealmError::Rejected { diagnostic } | RealmError::GroupLookupFailed { diagnostic } => {
                Some(diagnostic)
            }
            _ => None,
        }
    }
}
