//! Check command - validates the realm configuration.
//!
//! Run with `scriptrealm check` before putting the realm in front of real
//! logins: it tokenizes the configured command lines and resolves their
//! executables without running them.

use std::path::Path;

use anyhow::{bail, Result};

use crate::config::RealmConfig;
use crate::tokenizer;

/// Result of a single configuration check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed.
    Pass,
    /// Check failed - logins will fail.
    Fail,
    /// Check passed but with a warning.
    Warn,
}

impl CheckResult {
    pub fn pass_with(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            details: Some(details.to_string()),
        }
    }

    pub fn fail(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            details: Some(details.to_string()),
        }
    }

    pub fn warn(name: &str, details: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warn,
            details: Some(details.to_string()),
        }
    }
}

/// Results of all configuration checks.
pub struct CheckReport {
    pub checks: Vec<CheckResult>,
}

impl CheckReport {
    /// Returns true if all checks passed (no failures).
    pub fn all_passed(&self) -> bool {
        !self.checks.iter().any(|c| c.status == CheckStatus::Fail)
    }

    /// Count of failed checks.
    pub fn fail_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .count()
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("=== Configuration Check Results ===\n");

        for check in &self.checks {
            let (icon, status_str) = match check.status {
                CheckStatus::Pass => ("✓", "PASS"),
                CheckStatus::Fail => ("✗", "FAIL"),
                CheckStatus::Warn => ("⚠", "WARN"),
            };

            print!("  {} [{}] {}", icon, status_str, check.name);
            if let Some(details) = &check.details {
                println!(": {}", details);
            } else {
                println!();
            }
        }

        println!();
        let total = self.checks.len();
        let passed = self
            .checks
            .iter()
            .filter(|c| c.status == CheckStatus::Pass)
            .count();
        println!("Summary: {}/{} passed", passed, total);
        if self.fail_count() > 0 {
            println!("         {} FAILED - logins will not succeed", self.fail_count());
        }
    }
}

/// Execute the check command.
pub fn cmd_check(config: &RealmConfig, strict: bool) -> Result<()> {
    let report = run_checks(config);
    report.print();

    if !report.all_passed() {
        if strict {
            bail!(
                "Configuration check failed: {} check(s) failed.",
                report.fail_count()
            );
        }
        println!("Some checks failed. Use --strict to fail with a non-zero exit code.");
    }
    Ok(())
}

/// Run all configuration checks.
pub fn run_checks(config: &RealmConfig) -> CheckReport {
    let mut checks = Vec::new();

    checks.extend(check_command_line("auth command", &config.command_line));

    if config.has_groups_command() {
        checks.extend(check_command_line(
            "groups command",
            &config.groups_command_line,
        ));
        if config.groups_delimiter.chars().count() > 1 {
            checks.push(CheckResult::warn(
                "groups delimiter",
                &format!(
                    "{:?} is matched as a whole substring, not as a set of characters",
                    config.groups_delimiter
                ),
            ));
        } else {
            checks.push(CheckResult::pass_with(
                "groups delimiter",
                &format!("{:?}", config.groups_delimiter),
            ));
        }
    } else {
        checks.push(CheckResult::pass_with(
            "groups command",
            "unset; users get only the implicit authenticated role",
        ));
    }

    CheckReport { checks }
}

fn check_command_line(name: &str, line: &str) -> Vec<CheckResult> {
    if line.trim().is_empty() {
        return vec![CheckResult::fail(name, "not configured")];
    }

    let argv = match tokenizer::tokenize(line) {
        Ok(argv) => argv,
        Err(err) => return vec![CheckResult::fail(name, &err.to_string())],
    };

    let mut checks = vec![CheckResult::pass_with(
        name,
        &format!("{} token(s)", argv.len()),
    )];
    checks.push(check_executable(name, &argv[0]));
    checks
}

fn check_executable(name: &str, program: &str) -> CheckResult {
    let check_name = format!("{} executable", name);
    if program.contains('/') {
        if Path::new(program).exists() {
            CheckResult::pass_with(&check_name, program)
        } else {
            CheckResult::fail(&check_name, &format!("{} does not exist", program))
        }
    } else {
        match which::which(program) {
            Ok(path) => CheckResult::pass_with(&check_name, &path.display().to_string()),
            Err(_) => CheckResult::fail(&check_name, &format!("{} not found on PATH", program)),
        }
    }
}
