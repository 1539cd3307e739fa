//! Shared helpers for CLI integration tests

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// A scratch directory with its own workflow store
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("store").join("workflows.json")
    }

    /// Write a definition file into the scratch directory
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("write definition file");
        path
    }

    /// `cmdr` pointed at this environment's store
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("cmdr").expect("cmdr binary");
        cmd.env_remove("CMDR_STORE")
            .env_remove("RUST_LOG")
            .arg("--store")
            .arg(self.store_path());
        cmd
    }

    /// Import `content` as a definition file named `name`
    pub fn import(&self, name: &str, content: &str) {
        let path = self.write(name, content);
        self.cmd().arg("import").arg(path).assert().success();
    }
}
