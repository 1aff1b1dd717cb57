use std::path::PathBuf;

use matchstats::adapter::outbound::sqlite::database::connection::{open, DbPool};
use tempfile::TempDir;

/// SQLite database files inside a temporary directory.
pub struct TempDb {
    dir: TempDir,
}

impl TempDb {
    pub fn create() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{name}.db"))
    }

    pub fn url(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }

    pub fn pool(&self, name: &str) -> DbPool {
        open(&self.url(name)).expect("open sqlite pool")
    }
}
