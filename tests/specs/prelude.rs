//! Shared helpers for specs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Exit code for bad input.
pub const EXIT_USAGE: i32 = 2;
/// Exit code for a URL that is not tracked.
pub const EXIT_NOT_TRACKED: i32 = 3;

fn yajn_command() -> Command {
    // The binary is built by `cargo test --workspace`.
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin("yajn"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// `yajn` with no state directory, for help and usage specs.
pub fn cli() -> Cli {
    Cli { cmd: yajn_command() }
}

/// An isolated state directory shared by the `yajn` runs made from it.
pub struct StateDir {
    dir: TempDir,
}

impl StateDir {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the state directory.
    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).unwrap()
    }

    pub fn read_json(&self, name: &str) -> serde_json::Value {
        serde_json::from_str(&self.read(name)).unwrap()
    }

    pub fn yajn(&self) -> Cli {
        let mut cmd = yajn_command();
        cmd.env("YAJN_STATE_DIR", self.path());
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    fn run(mut self) -> Run {
        let output = self.cmd.output().unwrap();
        Run {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Run and require exit code 0.
    pub fn passes(self) -> Run {
        let run = self.run();
        assert_eq!(
            run.code,
            Some(0),
            "expected success\nstdout:\n{}\nstderr:\n{}",
            run.stdout,
            run.stderr
        );
        run
    }

    /// Run and require a non-zero exit code.
    pub fn fails(self) -> Run {
        let run = self.run();
        assert_ne!(run.code, Some(0), "expected failure\nstdout:\n{}", run.stdout);
        run
    }
}

pub struct Run {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl Run {
    pub fn stdout(&self) -> String {
        self.stdout.clone()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout lacks {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout.contains(needle), "stdout has {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr lacks {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn code(self, expected: i32) -> Self {
        assert_eq!(self.code, Some(expected), "stderr:\n{}", self.stderr);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }
}
