//! Login command - runs one authentication attempt.
//!
//! Exit codes: 0 accepted, 1 rejected, 2 service/configuration failure, so
//! wrapper scripts can tell "bad credentials" from "the realm is broken".

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::warn;

use crate::config::RealmConfig;
use crate::error::RealmError;
use crate::realm::ScriptRealm;

/// Execute the login command.
pub fn cmd_login(config: &RealmConfig, username: &str) -> Result<()> {
    let password = read_password()?;
    let realm = ScriptRealm::new(config.clone());

    match realm.authenticate(username, &password) {
        Ok(user) => {
            println!("accepted: {} [{}]", user.username, user.roles.join(", "));
            Ok(())
        }
        Err(err @ RealmError::Rejected { .. }) => {
            log_diagnostic(&err);
            println!("rejected");
            std::process::exit(1);
        }
        Err(err @ RealmError::GroupLookupFailed { .. }) => {
            log_diagnostic(&err);
            println!("rejected (roles could not be determined)");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("service unavailable: {}", err);
            std::process::exit(2);
        }
    }
}

fn log_diagnostic(err: &RealmError) {
    if let Some(diagnostic) = err.diagnostic() {
        if !diagnostic.is_empty() {
            // Operator-facing only; may contain script internals.
            warn!(diagnostic, "script diagnostic");
        }
    }
}

/// Read the password from `SCRIPTREALM_PASSWORD`, falling back to one line
/// from stdin. The prompt goes to stderr so piped stdout stays clean.
fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var("SCRIPTREALM_PASSWORD") {
        return Ok(password);
    }

    eprint!("Password: ");
    std::io::stderr().flush().ok();

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
