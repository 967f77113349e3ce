//! Groups command - looks up roles for an already-trusted username.

use anyhow::Result;
use tracing::warn;

use crate::config::RealmConfig;
use crate::error::RealmError;
use crate::realm::ScriptRealm;

/// Execute the groups command. Prints one role per line.
pub fn cmd_groups(config: &RealmConfig, username: &str) -> Result<()> {
    let realm = ScriptRealm::new(config.clone());

    match realm.load_groups(username) {
        Ok(roles) => {
            for role in roles {
                println!("{}", role);
            }
            Ok(())
        }
        Err(err @ RealmError::GroupLookupFailed { .. }) => {
            if let Some(diagnostic) = err.diagnostic() {
                if !diagnostic.is_empty() {
                    warn!(diagnostic, "groups script diagnostic");
                }
            }
            eprintln!("group lookup failed for {}", username);
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("service unavailable: {}", err);
            std::process::exit(2);
        }
    }
}
