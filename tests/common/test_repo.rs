//! TestRepo builder: a temporary working directory with C files in it
//!
//! The CLI is run with the repo as its working directory, so the default
//! `outputs/` directory lands inside the temp dir.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A realistic header-plus-implementation style file used across tests
pub const SAMPLE_C: &str = r#"/* sample.c - small C module */
#include <stdio.h>
#include <stdlib.h>

#define VERSION "1.2.0"
#define MAX_USERS 128
#define ENABLE_LOGGING
#define SQUARE(x) ((x) * (x))

typedef struct {
    int id;
    char name[32];
    double balance;
} Account;

struct Point {
    int x;
    int y;
};

typedef enum {
    STATUS_OK,
    STATUS_ERROR,
    STATUS_PENDING
} Status;

enum Color { RED, GREEN, BLUE };

int add(int a, int b);
void reset(void);
char *duplicate(const char *src);

static int helper(int value)
{
    return value * 2;
}

int main(int argc, char **argv)
{
    Account acct = { 1, "root", 0.0 };
    if (argc > 1) {
        printf("%s\n", argv[1]);
    }
    return add(helper(acct.id), MAX_USERS);
}
"#;

/// Builder for a scratch directory with C sources
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new empty test directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Get the path to the test directory root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a source file with the given content
    pub fn add_file(&self, relative_path: &str, content: &str) -> &Self {
        let full_path = self.dir.path().join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        self
    }

    /// Add an empty file
    pub fn add_empty_file(&self, relative_path: &str) -> &Self {
        self.add_file(relative_path, "")
    }

    /// Add `sample.c` with [`SAMPLE_C`]
    pub fn with_sample(&self) -> &Self {
        self.add_file("sample.c", SAMPLE_C)
    }

    /// Path of an artifact in the default output directory
    pub fn output_path(&self, artifact: &str) -> PathBuf {
        self.path().join("outputs").join(artifact)
    }

    /// Read an artifact from the default output directory
    pub fn read_output(&self, artifact: &str) -> String {
        let path = self.output_path(artifact);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }

    /// Run the cdecl-extract binary and return its output
    pub fn run_cli(&self, args: &[&str]) -> std::io::Result<Output> {
        self.run_cli_with_env(args, &[])
    }

    /// Run the binary with extra environment variables
    pub fn run_cli_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> std::io::Result<Output> {
        let mut command = Command::new(env!("CARGO_BIN_EXE_cdecl-extract"));
        command
            .current_dir(self.path())
            .env_remove("CDECL_OUTPUT_DIR")
            .env_remove("CDECL_BACKEND")
            .env_remove("RUST_LOG")
            .args(args);
        for (key, value) in env {
            command.env(key, value);
        }
        command.output()
    }

    /// Run CLI and expect success, return stdout
    pub fn run_cli_success(&self, args: &[&str]) -> String {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            output.status.success(),
            "CLI command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run CLI and expect failure, return (exit code, stderr)
    pub fn run_cli_failure(&self, args: &[&str]) -> (Option<i32>, String) {
        let output = self.run_cli(args).expect("Failed to run CLI");
        assert!(
            !output.status.success(),
            "CLI command {:?} should have failed",
            args
        );
        (
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        )
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}
