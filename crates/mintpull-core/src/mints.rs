use std::fs;
use std::path::Path;

use crate::error::PullError;

/// Reads the mint list: a JSON array of strings, returned verbatim.
pub fn load_mint_list(path: &Path) -> Result<Vec<String>, PullError> {
    let contents = fs::read_to_string(path).map_err(|err| PullError::Input {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    serde_json::from_str(&contents).map_err(|err| PullError::Input {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}
