use berner_core::{CoreResult, StorageError};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads the whole file, `None` when it does not exist.
pub(crate) fn read_existing(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Best-effort whole-file overwrite. Not atomic with respect to crashes.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::WriteFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| StorageError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
