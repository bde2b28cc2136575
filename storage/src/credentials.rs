use crate::json_file::{read_existing, write_json};
use berner_core::{CoreResult, Credentials, StorageError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Plaintext JSON file holding the app id and both OAuth tokens.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> CoreResult<Credentials> {
        let content = read_existing(&self.path)?.ok_or_else(|| {
            StorageError::CredentialStoreMissing {
                path: self.path.clone(),
            }
        })?;

        let credentials: Credentials =
            serde_json::from_str(&content).map_err(|e| StorageError::CredentialStoreCorrupt {
                path: self.path.clone(),
                details: e.to_string(),
            })?;

        debug!(
            "Loaded credentials for app {} from {}",
            credentials.app_id,
            self.path.display()
        );
        Ok(credentials)
    }

    pub fn save(&self, credentials: &Credentials) -> CoreResult<()> {
        write_json(&self.path, credentials)?;
        info!("Saved Reddit credentials to {}", self.path.display());
        Ok(())
    }
}
