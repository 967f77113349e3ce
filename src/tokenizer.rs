//! Quote-aware command-line tokenization.
//!
//! Configured command lines like `/opt/auth/check.sh --backend "ldap main"`
//! are split into an argument vector before execution; no shell is involved
//! at run time, so nothing in the line (or in the credentials passed via the
//! environment) gets a second round of interpretation.

use crate::error::RealmError;

/// Split a configured command line into an argument vector.
///
/// Whitespace separates tokens; single and double quotes group tokens with
/// embedded whitespace.
///
/// # Errors
///
/// Returns [`RealmError::MalformedCommandLine`] when the line has unbalanced
/// quoting or contains no tokens at all.
pub fn tokenize(line: &str) -> Result<Vec<String>, RealmError> {
    let argv =
        shlex::split(line).ok_or_else(|| RealmError::MalformedCommandLine(line.to_string()))?;
    if argv.is_empty() {
        return Err(RealmError::MalformedCommandLine(line.to_string()));
    }
    Ok(argv)
}
