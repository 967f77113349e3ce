//! Unit tests for the scriptrealm pure functions.
//!
//! These exercise tokenization, environment construction and configuration
//! loading in isolation, without running any external process.

mod helpers;

use std::collections::HashMap;
use std::fs;

use serial_test::serial;

use helpers::TestEnv;
use scriptrealm::config::{CONFIG_FILE_NAME, DEFAULT_GROUPS_DELIMITER, RealmConfig};
use scriptrealm::environment::{build_environment, inherited_entries, platform_required_vars};
use scriptrealm::error::RealmError;
use scriptrealm::resolver::ResolverSelector;
use scriptrealm::tokenizer::tokenize;

fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// tokenizer.rs tests
// =============================================================================

#[test]
fn test_tokenize_single_token() {
    let argv = tokenize("/bin/true").expect("tokenize should succeed");
    assert_eq!(argv, vec!["/bin/true"]);
}

#[test]
fn test_tokenize_double_quoted_token() {
    let argv = tokenize("cmd \"a b\" c").expect("tokenize should succeed");
    assert_eq!(argv, vec!["cmd", "a b", "c"]);
}

#[test]
fn test_tokenize_single_quoted_token() {
    let argv = tokenize("login.sh 'x y' z").expect("tokenize should succeed");
    assert_eq!(argv, vec!["login.sh", "x y", "z"]);
}

#[test]
fn test_tokenize_quoted_program_path() {
    let argv = tokenize("\"/opt/my scripts/auth.sh\" --verbose").expect("tokenize should succeed");
    assert_eq!(argv, vec!["/opt/my scripts/auth.sh", "--verbose"]);
}

#[test]
fn test_tokenize_unbalanced_double_quote_fails() {
    let err = tokenize("cmd \"unterminated").unwrap_err();
    assert!(matches!(err, RealmError::MalformedCommandLine(_)));
}

#[test]
fn test_tokenize_unbalanced_single_quote_fails() {
    let err = tokenize("cmd 'unterminated").unwrap_err();
    assert!(matches!(err, RealmError::MalformedCommandLine(_)));
}

#[test]
fn test_tokenize_blank_line_fails() {
    assert!(matches!(
        tokenize("").unwrap_err(),
        RealmError::MalformedCommandLine(_)
    ));
    assert!(matches!(
        tokenize("   ").unwrap_err(),
        RealmError::MalformedCommandLine(_)
    ));
}

// =============================================================================
// environment.rs tests
// =============================================================================

#[test]
fn test_password_with_dollar_dollar_not_expanded() {
    let env = build_environment(
        ["HOME=/root"],
        &overrides(&[("U", "user"), ("P", "dummy$$pwd")]),
    )
    .expect("build should succeed");

    assert_eq!(env.get("P").map(String::as_str), Some("dummy$$pwd"));
}

#[test]
fn test_password_with_variable_reference_not_expanded() {
    let env = build_environment(
        ["PATH=/usr/bin"],
        &overrides(&[("P", "pre-$PATH-post")]),
    )
    .expect("build should succeed");

    assert_eq!(env.get("P").map(String::as_str), Some("pre-$PATH-post"));
}

#[test]
fn test_overrides_win_over_parent() {
    let env = build_environment(["U=from-parent"], &overrides(&[("U", "from-override")]))
        .expect("build should succeed");

    assert_eq!(env.get("U").map(String::as_str), Some("from-override"));
}

#[test]
fn test_parent_entries_survive_merge() {
    let env = build_environment(["A=1", "B=2"], &overrides(&[("U", "user")]))
        .expect("build should succeed");

    assert_eq!(env.get("A").map(String::as_str), Some("1"));
    assert_eq!(env.get("B").map(String::as_str), Some("2"));
    assert_eq!(env.get("U").map(String::as_str), Some("user"));
}

#[test]
fn test_parent_value_may_contain_equals() {
    let env = build_environment(["OPTS=a=b"], &HashMap::new()).expect("build should succeed");
    assert_eq!(env.get("OPTS").map(String::as_str), Some("a=b"));
}

#[test]
fn test_parent_value_may_be_empty() {
    let env = build_environment(["EMPTY="], &HashMap::new()).expect("build should succeed");
    assert_eq!(env.get("EMPTY").map(String::as_str), Some(""));
}

#[test]
fn test_entry_without_equals_fails() {
    let err = build_environment(["NO_SEPARATOR"], &HashMap::new()).unwrap_err();
    assert!(matches!(err, RealmError::MalformedEnvironmentEntry(_)));
}

#[cfg(unix)]
#[test]
fn test_no_platform_vars_required_on_unix() {
    assert!(platform_required_vars().is_empty());
}

#[test]
#[serial]
fn test_inherited_entries_reflect_ambient_environment() {
    std::env::set_var("SCRIPTREALM_TEST_MARKER", "42");
    let entries = inherited_entries();
    assert!(entries.contains(&"SCRIPTREALM_TEST_MARKER=42".to_string()));
    std::env::remove_var("SCRIPTREALM_TEST_MARKER");
}

// =============================================================================
// config.rs tests
// =============================================================================

fn clear_realm_env() {
    for name in [
        "SCRIPTREALM_COMMAND",
        "SCRIPTREALM_GROUPS_COMMAND",
        "SCRIPTREALM_GROUPS_DELIMITER",
        "SCRIPTREALM_NAME_RESOLVER",
        "SCRIPTREALM_EMAIL_RESOLVER",
        "SCRIPTREALM_LOG_CREDENTIALS",
    ] {
        std::env::remove_var(name);
    }
}

#[test]
fn test_new_defaults() {
    let config = RealmConfig::new("/opt/auth.sh");
    assert_eq!(config.command_line, "/opt/auth.sh");
    assert!(!config.has_groups_command());
    assert_eq!(config.groups_delimiter, DEFAULT_GROUPS_DELIMITER);
    assert_eq!(config.name_resolver, ResolverSelector::None);
    assert!(!config.log_credentials);
}

#[test]
fn test_validate_accepts_quoted_command() {
    let config = RealmConfig::new("\"/opt/my scripts/auth.sh\" --check");
    config.validate().expect("validate should succeed");
}

#[test]
fn test_validate_rejects_unbalanced_quote() {
    let config = RealmConfig::new("/opt/auth.sh \"oops");
    assert!(matches!(
        config.validate().unwrap_err(),
        RealmError::MalformedCommandLine(_)
    ));
}

#[test]
fn test_validate_rejects_blank_command() {
    let config = RealmConfig::new("");
    assert!(matches!(
        config.validate().unwrap_err(),
        RealmError::MalformedCommandLine(_)
    ));
}

#[test]
fn test_validate_rejects_bad_groups_command() {
    let mut config = RealmConfig::new("/bin/true");
    config.groups_command_line = "groups.sh 'oops".to_string();
    assert!(matches!(
        config.validate().unwrap_err(),
        RealmError::MalformedCommandLine(_)
    ));
}

#[test]
#[serial]
fn test_load_from_json_file() {
    clear_realm_env();
    let env = TestEnv::new();
    fs::write(
        env.path(CONFIG_FILE_NAME),
        r#"{
            "command": "/opt/auth.sh --check",
            "groups_command": "/opt/groups.sh",
            "groups_delimiter": ";",
            "name_resolver": "*",
            "email_resolver": "ldap",
            "log_credentials": false
        }"#,
    )
    .expect("Failed to write config file");

    let config = RealmConfig::load(&env.dir).expect("load should succeed");
    assert_eq!(config.command_line, "/opt/auth.sh --check");
    assert_eq!(config.groups_command_line, "/opt/groups.sh");
    assert_eq!(config.groups_delimiter, ";");
    assert_eq!(config.name_resolver, ResolverSelector::Any);
    assert_eq!(
        config.email_resolver,
        ResolverSelector::Named("ldap".to_string())
    );
    assert!(!config.log_credentials);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_realm_env();
    let env = TestEnv::new();
    fs::write(
        env.path(CONFIG_FILE_NAME),
        r#"{"command": "/opt/from-file.sh"}"#,
    )
    .expect("Failed to write config file");

    std::env::set_var("SCRIPTREALM_COMMAND", "/opt/from-env.sh");
    let config = RealmConfig::load(&env.dir).expect("load should succeed");
    clear_realm_env();

    assert_eq!(config.command_line, "/opt/from-env.sh");
}

#[test]
#[serial]
fn test_blank_delimiter_defaults_to_comma() {
    clear_realm_env();
    let env = TestEnv::new();

    std::env::set_var("SCRIPTREALM_COMMAND", "/bin/true");
    let config = RealmConfig::load(&env.dir).expect("load should succeed");
    clear_realm_env();

    assert_eq!(config.groups_delimiter, DEFAULT_GROUPS_DELIMITER);
}

#[test]
#[serial]
fn test_log_credentials_env_parsing() {
    clear_realm_env();
    let env = TestEnv::new();

    std::env::set_var("SCRIPTREALM_COMMAND", "/bin/true");
    std::env::set_var("SCRIPTREALM_LOG_CREDENTIALS", "true");
    let enabled = RealmConfig::load(&env.dir).expect("load should succeed");

    std::env::set_var("SCRIPTREALM_LOG_CREDENTIALS", "0");
    let disabled = RealmConfig::load(&env.dir).expect("load should succeed");
    clear_realm_env();

    assert!(enabled.log_credentials);
    assert!(!disabled.log_credentials);
}

// =============================================================================
// error.rs tests
// =============================================================================

#[test]
fn test_only_rejection_is_a_credential_failure() {
    let rejected = RealmError::Rejected {
        diagnostic: String::new(),
    };
    let service = RealmError::Service(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "no such script",
    ));

    assert!(rejected.is_credential_failure());
    assert!(!service.is_credential_failure());
}

#[test]
fn test_diagnostic_exposed_for_script_failures() {
    let err = RealmError::GroupLookupFailed {
        diagnostic: "lookup broken".to_string(),
    };
    assert_eq!(err.diagnostic(), Some("lookup broken"));

    let err = RealmError::MalformedCommandLine("x \"".to_string());
    assert_eq!(err.diagnostic(), None);
}
