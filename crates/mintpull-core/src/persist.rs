use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PullError;
use crate::model::{ChangeEntry, OffChainDocument};

/// Writes the off-chain document for `mint` to `<metadata_dir>/<mint>.json`.
pub fn write_metadata(
    metadata_dir: &Path,
    mint: &str,
    document: &OffChainDocument,
) -> Result<PathBuf, PullError> {
    let path = metadata_dir.join(format!("{mint}.json"));
    let serialized = serde_json::to_string_pretty(document).map_err(PullError::Encode)?;
    fs::write(&path, serialized).map_err(|err| PullError::write(&path, err))?;
    Ok(path)
}

/// Writes the whole change list once at the end of a run. An empty list still produces `[]`.
pub fn write_change_manifest(path: &Path, changes: &[ChangeEntry]) -> Result<(), PullError> {
    write_json_atomically(path, changes)
}

fn write_json_atomically<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PullError> {
    let serialized = serde_json::to_string_pretty(value).map_err(PullError::Encode)?;
    let temp_path = build_temp_path(path);
    fs::write(&temp_path, format!("{serialized}\n"))
        .map_err(|err| PullError::write(&temp_path, err))?;
    fs::rename(&temp_path, path).map_err(|err| PullError::write(path, err))?;
    Ok(())
}

fn build_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => {
            temp_path.set_extension(format!("{ext}.tmp"));
        }
        _ => {
            temp_path.set_extension("tmp");
        }
    }
    temp_path
}
