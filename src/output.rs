//! Artifact writer: one pretty-printed JSON array per record collection

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::fs_utils::write_atomic;
use crate::schema::Records;

pub const MACROS_FILE: &str = "macros.json";
pub const TYPES_FILE: &str = "types.json";
pub const APIS_FILE: &str = "apis.json";

/// Default output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Paths of the artifacts written by [`write_records`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    pub macros: PathBuf,
    pub types: PathBuf,
    pub apis: PathBuf,
}

/// Write `macros.json`, `types.json` and `apis.json` into `dir`.
///
/// The directory is created if missing. Existing artifacts are replaced.
///
/// # Errors
///
/// `ExtractError::OutputWrite` naming the directory or file that failed.
pub fn write_records(dir: &Path, records: &Records) -> Result<WrittenArtifacts> {
    fs::create_dir_all(dir).map_err(|source| ExtractError::OutputWrite {
        path: dir.to_path_buf(),
        source,
    })?;

    let artifacts = WrittenArtifacts {
        macros: dir.join(MACROS_FILE),
        types: dir.join(TYPES_FILE),
        apis: dir.join(APIS_FILE),
    };

    write_json(&artifacts.macros, &records.macros)?;
    write_json(&artifacts.types, &records.types)?;
    write_json(&artifacts.apis, &records.apis)?;

    Ok(artifacts)
}

/// Render a record list exactly as it is written to disk
pub fn to_json<T: Serialize>(records: &[T]) -> Result<String> {
    let mut json =
        serde_json::to_string_pretty(records).map_err(|e| ExtractError::Serialize {
            message: e.to_string(),
        })?;
    json.push('\n');
    Ok(json)
}

fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = to_json(records)?;
    write_atomic(path, json.as_bytes()).map_err(|source| ExtractError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}
