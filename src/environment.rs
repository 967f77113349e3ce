//! Child process environment construction.
//!
//! Credentials travel to the login script as environment variables, exactly
//! as the user typed them. The merge below therefore performs no variable
//! expansion of any kind: a password containing `$$` or a `$PATH`-shaped
//! substring must reach the child byte-for-byte.

use std::collections::HashMap;

use crate::error::RealmError;

/// Variables the OS requires in every child environment for process
/// creation to succeed. Windows refuses to spawn without `SystemRoot`;
/// Unix needs nothing.
pub fn platform_required_vars() -> &'static [&'static str] {
    if cfg!(windows) {
        &["SystemRoot"]
    } else {
        &[]
    }
}

/// Render the ambient process environment as `NAME=VALUE` entries.
pub fn inherited_entries() -> Vec<String> {
    std::env::vars()
        .map(|(name, value)| format!("{name}={value}"))
        .collect()
}

/// Merge `NAME=VALUE` parent entries with override bindings.
///
/// Each parent entry is split on its first `=`. Overrides win over
/// same-named parent entries, and every value is copied verbatim - no
/// `$NAME` or `$$` sequence is ever rewritten, because override values are
/// credentials that must reach the child as entered.
///
/// Platform-required variables (see [`platform_required_vars`]) are copied
/// in from the ambient environment when the merged map lacks them, again
/// without expansion.
///
/// # Errors
///
/// Returns [`RealmError::MalformedEnvironmentEntry`] for a parent entry
/// without a `=` separator.
pub fn build_environment<I, S>(
    parent: I,
    overrides: &HashMap<String, String>,
) -> Result<HashMap<String, String>, RealmError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut env = HashMap::new();

    for entry in parent {
        let entry = entry.as_ref();
        let (name, value) = entry
            .split_once('=')
            .ok_or_else(|| RealmError::MalformedEnvironmentEntry(entry.to_string()))?;
        env.insert(name.to_string(), value.to_string());
    }

    for (name, value) in overrides {
        env.insert(name.clone(), value.clone());
    }

    for name in platform_required_vars() {
        if !env.contains_key(*name) {
            if let Ok(value) = std::env::var(name) {
                env.insert((*name).to_string(), value);
            }
        }
    }

    Ok(env)
}
