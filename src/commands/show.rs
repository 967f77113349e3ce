//! Show command - displays information.

use anyhow::Result;

use crate::commands::check::run_checks;
use crate::config::RealmConfig;

/// Execute `show config`.
pub fn cmd_show_config(config: &RealmConfig) -> Result<()> {
    config.print();
    println!();

    let report = run_checks(config);
    if report.all_passed() {
        println!("Configuration check: OK");
    } else {
        println!(
            "Configuration check: {} issue(s). Run 'scriptrealm check' for details.",
            report.fail_count()
        );
    }
    Ok(())
}
