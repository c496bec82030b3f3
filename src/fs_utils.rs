//! Filesystem helpers for writing output artifacts
//!
//! - `atomic_rename`: replace a file in one step (Windows needs an explicit delete)
//! - `write_atomic`: write to a temporary sibling, then rename over the target

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Cross-platform atomic rename that handles Windows file replacement.
///
/// On Unix, `fs::rename` atomically replaces the target if it exists.
/// On Windows, `fs::rename` fails if the target exists, so the target is
/// deleted first.
///
/// # Errors
///
/// Returns an error if the source is missing, the target cannot be removed
/// (Windows only), or the rename itself fails.
pub fn atomic_rename(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        if dst.exists() {
            fs::remove_file(dst)?;
        }
    }
    fs::rename(src, dst)
}

/// Temporary sibling used while writing `path`
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `contents` to `path`, replacing any existing file.
///
/// Readers never observe a half-written artifact: the bytes go to
/// `<path>.tmp` first and are renamed into place.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp = temp_sibling(path);
    fs::write(&tmp, contents)?;
    if let Err(e) = atomic_rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}
