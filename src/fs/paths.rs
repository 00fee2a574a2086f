//! Path manipulation helpers

use std::path::{Path, PathBuf};

/// Join two path components
pub fn join_path(a: &str, b: &str) -> String {
    Path::new(a).join(b).to_string_lossy().to_string()
}

/// Absolute, lexically normalized form of a path (symlinks are not resolved)
pub fn abspath(path: &str) -> String {
    let p = Path::new(path);
    let joined = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(p)
    };
    normalize(&joined).to_string_lossy().to_string()
}

/// Get the basename (filename) of a path
pub fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Get the directory name (parent) of a path
pub fn dirname(path: &str) -> String {
    Path::new(path)
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Split into (dirname, basename)
pub fn split_path(path: &str) -> (String, String) {
    (dirname(path), basename(path))
}

/// Extension including the leading dot, or empty
pub fn extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// File name without its extension
pub fn stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// The user's home directory
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

pub fn exists(path: &str) -> bool {
    Path::new(path).exists()
}

pub fn is_file(path: &str) -> bool {
    Path::new(path).is_file()
}

pub fn is_dir(path: &str) -> bool {
    Path::new(path).is_dir()
}

pub fn is_link(path: &str) -> bool {
    Path::new(path).is_symlink()
}

fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
