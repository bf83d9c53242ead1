use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::SyncError;

pub fn read_json(path: &Path) -> Result<Value, SyncError> {
    let text = fs::read_to_string(path).map_err(|source| SyncError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SyncError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as two-space indented JSON, creating parent directories.
pub fn write_json(path: &Path, value: &Value) -> Result<(), SyncError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SyncError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = serde_json::to_string_pretty(value).map_err(SyncError::Encode)?;
    fs::write(path, text).map_err(|source| SyncError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "wrote json");
    Ok(())
}
