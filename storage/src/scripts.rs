use berner_core::{CoreResult, ScriptTemplate, StorageError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const SCRIPT_EXTENSION: &str = "txt";

/// Directory of plain-text comment templates.
#[derive(Debug, Clone)]
pub struct ScriptLibrary {
    dir: PathBuf,
    max_bytes: u64,
}

impl ScriptLibrary {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn ensure_dir(&self) -> CoreResult<()> {
        if !self.dir.is_dir() {
            info!("Creating scripts directory {}", self.dir.display());
            fs::create_dir_all(&self.dir).map_err(|source| StorageError::WriteFailed {
                path: self.dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Loads every `*.txt` file under the directory whose size is within the cap.
    /// Oversized or unreadable files are skipped. The result may be empty.
    pub fn load(&self) -> Vec<ScriptTemplate> {
        let mut scripts = Vec::new();

        let walker = WalkDir::new(&self.dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !has_script_extension(entry.path()) {
                continue;
            }

            let len = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            if len > self.max_bytes {
                debug!(
                    "Skipping {} ({} bytes exceeds {} byte limit)",
                    entry.path().display(),
                    len,
                    self.max_bytes
                );
                continue;
            }

            match fs::read_to_string(entry.path()) {
                Ok(content) => scripts.push(ScriptTemplate {
                    path: entry.into_path(),
                    content,
                }),
                Err(e) => warn!("Skipping {}: {}", entry.path().display(), e),
            }
        }

        info!(
            "Loaded {} script templates from {}",
            scripts.len(),
            self.dir.display()
        );
        scripts
    }
}

fn has_script_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(SCRIPT_EXTENSION))
        .unwrap_or(false)
}
