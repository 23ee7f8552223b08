//! Position save kept in a plain text file.

use std::fs;
use std::path::{Path, PathBuf};

use duelwing_core::platform::SaveStore;
use duelwing_core::Result;

/// Save store backed by one file on disk.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    path: PathBuf,
}

impl FileSaveStore {
    /// Store reading and writing `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File the save lives in.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for FileSaveStore {
    fn read(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }

    fn write(&mut self, contents: &str) -> Result<()> {
        fs::write(&self.path, contents)?;
        tracing::debug!(path = %self.path.display(), bytes = contents.len(), "save written");
        Ok(())
    }
}
