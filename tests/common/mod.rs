//! Helpers for integration tests.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Temporary directory holding reference data and recorded feeds.
pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        TestData {
            dir: tempfile::tempdir().expect("Failed to create temporary directory."),
        }
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write test data.");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
