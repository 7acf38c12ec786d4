//! Test environment for isolated doselog CLI runs.
//!
//! Each `TestEnv` gets its own temp directory holding the state file, so
//! tests never touch the real `~/.doselog` and can run in parallel.

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Result of running a doselog CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with its own state file
pub struct TestEnv {
    _dir: TempDir,
    state_path: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let state_path = dir.path().join("state.json");
        Self {
            _dir: dir,
            state_path,
        }
    }

    pub fn state_path(&self) -> &PathBuf {
        &self.state_path
    }

    /// Run the doselog binary against this environment's state file
    pub fn run(&self, args: &[&str]) -> TestResult {
        let bin = env!("CARGO_BIN_EXE_doselog");
        let output = Command::new(bin)
            .arg("--state")
            .arg(&self.state_path)
            .args(args)
            .output()
            .expect("failed to run doselog");

        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Run with `--json` and parse each stdout line as a JSON value
    pub fn run_json(&self, args: &[&str]) -> (TestResult, Vec<serde_json::Value>) {
        let bin = env!("CARGO_BIN_EXE_doselog");
        let output = Command::new(bin)
            .arg("--json")
            .arg("--state")
            .arg(&self.state_path)
            .args(args)
            .output()
            .expect("failed to run doselog");

        let result = TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        let values = result
            .stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).expect("invalid JSON line"))
            .collect();
        (result, values)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
