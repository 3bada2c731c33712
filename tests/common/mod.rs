//! Common test utilities for curl2code integration tests
//!
//! Every CLI run gets its own config directory so a developer's
//! `config.toml` never leaks into the assertions.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated config directory plus scratch space for input files
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self { dir: TempDir::new().expect("Failed to create temp dir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `config.toml` into the config directory
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(self.dir.path().join("config.toml"), toml).expect("Failed to write config");
        self
    }

    /// Write a scratch file and return its path
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// The curl2code binary, pointed at this environment's config directory
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_curl2code"));
        cmd.env("CURL2CODE_CONFIG_DIR", self.dir.path());
        cmd.env_remove("CURL2CODE_LOG");
        cmd
    }
}

/// Run the CLI in a fresh environment
pub fn curl2code() -> Command {
    let env = TestEnv::new();
    let cmd = env.cmd();
    // A removed directory reads as no config
    drop(env);
    cmd
}
