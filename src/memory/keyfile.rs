use std::path::{Path, PathBuf};

use super::cipher::generate_key;
use crate::common::errors::{OnpullError, Result};

pub const DEFAULT_KEY_FILE: &str = "generated_key.txt";

/// A freshly generated key and where it was written
#[derive(Debug, Clone)]
pub struct GeneratedKey {
    pub key: String,
    pub path: PathBuf,
}

/// Generate a key and save it, with a label line, to `path`
pub fn generate_key_file(path: &Path) -> Result<GeneratedKey> {
    let key = generate_key();
    let contents = format!("Your encryption key:\n{}\n", key);
    std::fs::write(path, contents).map_err(|e| OnpullError::io(path, e))?;
    Ok(GeneratedKey {
        key,
        path: path.to_path_buf(),
    })
}
