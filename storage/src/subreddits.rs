use crate::json_file::{read_existing, write_json};
use berner_core::{CoreResult, StorageError, SubredditList};
use std::path::{Path, PathBuf};
use tracing::info;

/// JSON array of target community names.
#[derive(Debug, Clone)]
pub struct SubredditStore {
    path: PathBuf,
}

impl SubredditStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> CoreResult<SubredditList> {
        let content =
            read_existing(&self.path)?.ok_or_else(|| StorageError::SubredditListMissing {
                path: self.path.clone(),
            })?;

        let subreddits = serde_json::from_str(&content).map_err(|e| {
            StorageError::SubredditListCorrupt {
                path: self.path.clone(),
                details: e.to_string(),
            }
        })?;
        Ok(subreddits)
    }

    pub fn save(&self, subreddits: &[String]) -> CoreResult<()> {
        write_json(&self.path, subreddits)
    }

    /// Loads the list verbatim, or writes `defaults` first if no file exists yet.
    pub fn load_or_seed(&self, defaults: &[String]) -> CoreResult<SubredditList> {
        if self.path.exists() {
            return self.load();
        }

        info!(
            "Seeding {} with {} default subreddits",
            self.path.display(),
            defaults.len()
        );
        self.save(defaults)?;
        Ok(defaults.to_vec())
    }
}
