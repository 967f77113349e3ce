//! Script execution with an exact child environment.
//!
//! This is the realm's process-launching collaborator: it runs a tokenized
//! command line with a caller-supplied environment map, captures stderr for
//! diagnostics and either captures or discards stdout. The environment map
//! replaces the child environment wholesale and is passed through verbatim;
//! nothing here expands variables.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

/// Result of a script execution.
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    /// Exit status of the child.
    pub status: ExitStatus,
    /// Captured stdout; empty when stdout was discarded.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
}

impl ScriptOutput {
    /// Returns true if the script exited successfully.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get the exit code, or -1 if terminated by signal.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    /// Get stdout, trimmed of whitespace.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Get stderr, trimmed of whitespace.
    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}

/// Builder for a single script invocation.
pub struct Script {
    program: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    current_dir: Option<PathBuf>,
    discard_stdout: bool,
}

impl Script {
    /// Build from a tokenized command line. Returns `None` for an empty argv.
    pub fn from_argv(argv: Vec<String>) -> Option<Self> {
        let mut parts = argv.into_iter();
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            env: HashMap::new(),
            current_dir: None,
            discard_stdout: false,
        })
    }

    /// Replace the child environment with exactly `env`.
    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Set the working directory.
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    /// Send the child's stdout to a discard sink instead of capturing it.
    pub fn discard_stdout(mut self) -> Self {
        self.discard_stdout = true;
        self
    }

    /// Run the script and wait for it to exit.
    ///
    /// stdin is closed and stderr is always captured. A non-zero exit is not
    /// an error here - callers interpret the status.
    ///
    /// # Errors
    ///
    /// Fails with the underlying `io::Error` when the child cannot be
    /// launched (missing executable, permission denied) or waited on.
    pub fn run(self) -> io::Result<ScriptOutput> {
        // The argv is safe to log; credentials travel in the environment.
        debug!(program = %self.program, args = ?self.args, "running script");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .env_clear()
            .envs(&self.env)
            .stdin(Stdio::null())
            .stderr(Stdio::piped());

        if self.discard_stdout {
            cmd.stdout(Stdio::null());
        } else {
            cmd.stdout(Stdio::piped());
        }

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output()?;

        Ok(ScriptOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
