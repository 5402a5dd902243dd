//! Common test utilities for CLI testing.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

/// Test context with temporary directory
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config_path: Option<PathBuf>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("Failed to create temp dir"),
            config_path: None,
        }
    }

    /// Write a config file and point `BSPEC_CONFIG` at it
    pub fn with_config(mut self, config: &str) -> Self {
        let path = self.temp_dir.path().join("bspec.yaml");
        std::fs::write(&path, config).expect("Failed to write config");
        self.config_path = Some(path);
        self
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file below the temp directory, creating parents
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("bspec").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove("BSPEC_CONFIG")
            .env_remove("BSPEC_LOG_LEVEL")
            .env_remove("BSPEC_LOG_FORMAT")
            .env_remove("BSPEC_LOG_FILE")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        if let Some(config) = &self.config_path {
            cmd.env("BSPEC_CONFIG", config);
        }
        cmd
    }

    /// Run `bspec` with the given arguments and capture its output
    pub fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("Failed to run bspec")
    }

    /// `bspec init <name> --samples`
    pub fn init_project(&self, name: &str) -> PathBuf {
        self.run(&["init", name, "--samples", "--author", "Tester"])
            .assert_success();
        self.path().join(name)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert helpers for CLI output
pub trait OutputAssertions {
    fn assert_success(&self) -> &Self;
    fn assert_failure(&self) -> &Self;
    fn assert_stdout_contains(&self, text: &str) -> &Self;
    fn assert_stderr_contains(&self, text: &str) -> &Self;
    fn assert_exit_code(&self, code: i32) -> &Self;
    fn stdout_str(&self) -> String;
}

impl OutputAssertions for Output {
    fn assert_success(&self) -> &Self {
        assert!(
            self.status.success(),
            "Command failed with status: {}\nstderr: {}",
            self.status,
            String::from_utf8_lossy(&self.stderr)
        );
        self
    }

    fn assert_failure(&self) -> &Self {
        assert!(
            !self.status.success(),
            "Command succeeded unexpectedly\nstdout: {}",
            String::from_utf8_lossy(&self.stdout)
        );
        self
    }

    fn assert_stdout_contains(&self, text: &str) -> &Self {
        let stdout = String::from_utf8_lossy(&self.stdout);
        assert!(
            stdout.contains(text),
            "stdout did not contain '{}'\nstdout: {}",
            text,
            stdout
        );
        self
    }

    fn assert_stderr_contains(&self, text: &str) -> &Self {
        let stderr = String::from_utf8_lossy(&self.stderr);
        assert!(
            stderr.contains(text),
            "stderr did not contain '{}'\nstderr: {}",
            text,
            stderr
        );
        self
    }

    fn assert_exit_code(&self, code: i32) -> &Self {
        assert_eq!(
            self.status.code(),
            Some(code),
            "Expected exit code {}, got {:?}\nstderr: {}",
            code,
            self.status.code(),
            String::from_utf8_lossy(&self.stderr)
        );
        self
    }

    fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}
