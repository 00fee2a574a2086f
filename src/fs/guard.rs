//! Existence checks that fail with a descriptive error

use crate::error::{Error, Result};
use std::path::Path;

/// Fail with [`Error::PathNotFound`] on the first path that does not exist.
pub fn ensure_paths_exist<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<()> {
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
    }
    Ok(())
}

/// Fail with [`Error::PathExists`] on the first path that exists.
pub fn ensure_paths_dont_exist<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<()> {
    for path in paths {
        let path = path.as_ref();
        if path.exists() {
            return Err(Error::PathExists(path.to_path_buf()));
        }
    }
    Ok(())
}

/// Whether we are running under Windows Subsystem for Linux.
pub fn is_wsl() -> bool {
    cfg!(target_os = "linux")
        && std::fs::read_to_string("/proc/sys/kernel/osrelease")
            .map(|r| r.to_lowercase().contains("microsoft"))
            .unwrap_or(false)
}
