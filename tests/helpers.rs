//! Shared test utilities for scriptrealm tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use tempfile::TempDir;

use scriptrealm::config::RealmConfig;

/// Test environment with a temporary directory for operator scripts.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Directory the scripts are written into
    pub dir: PathBuf,
}

impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            dir,
        }
    }

    /// Write an executable `/bin/sh` script and return its absolute path as
    /// a string suitable for a command line.
    pub fn write_script(&self, name: &str, body: &str) -> String {
        let path = self.dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");

        let mut perms = fs::metadata(&path)
            .expect("Failed to stat script")
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("Failed to chmod script");

        path.to_string_lossy().into_owned()
    }

    /// Path of a file inside the test directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

/// Realm config pointing at an auth command line, group lookup disabled.
pub fn realm_config(command_line: &str) -> RealmConfig {
    RealmConfig::new(command_line)
}

/// Realm config with both an auth command and a groups command.
pub fn realm_config_with_groups(command_line: &str, groups_command_line: &str) -> RealmConfig {
    let mut config = RealmConfig::new(command_line);
    config.groups_command_line = groups_command_line.to_string();
    config
}
