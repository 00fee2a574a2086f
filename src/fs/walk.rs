//! Directory listing and creation helpers

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Audio file extensions
pub const EXT_AUDIO: &[&str] = &[".mp3", ".aac", ".ogg", ".flac", ".wav", ".aiff", ".dsd", ".pcm"];

/// Image file extensions
pub const EXT_IMAGE: &[&str] = &[
    ".jpg", ".png", ".jpeg", ".webp", ".gif", ".bmp", ".tif", ".tiff", ".jfif", ".heic", ".dib",
    ".jp2", ".jpx", ".j2k", ".jxl",
];

/// Video file extensions
pub const EXT_VIDEO: &[&str] = &[
    ".mp4", ".mkv", ".avi", ".flv", ".mov", ".webm", ".mpg", ".mpeg", ".mpe", ".mpv", ".ogg",
    ".m4p", ".m4v", ".wmv", ".f4v", ".swf",
];

/// Options for [`get_files_in`] and [`get_dirs_in`].
#[derive(Debug, Clone)]
pub struct ListOptions<'a> {
    /// Case-insensitive suffixes to keep, e.g. `[".rs", ".toml"]`. Empty keeps all.
    pub exts: &'a [&'a str],
    pub recursive: bool,
    /// Make returned paths absolute.
    pub absolute: bool,
}

impl Default for ListOptions<'_> {
    fn default() -> Self {
        Self {
            exts: &[],
            recursive: true,
            absolute: true,
        }
    }
}

/// Create a directory and its parents. With `exist_ok == false` an existing
/// path is an error.
pub fn mkdir(path: &Path, exist_ok: bool) -> Result<()> {
    if !exist_ok && path.exists() {
        return Err(Error::PathExists(path.to_path_buf()));
    }
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Create `dest` (if needed) and each of `names` inside it.
pub fn mkdirs(dest: &Path, names: &[&str]) -> Result<()> {
    mkdir(dest, true)?;
    for name in names {
        mkdir(&dest.join(name), true)?;
    }
    Ok(())
}

/// Files in `dir`, optionally filtered by extension.
///
/// Traversal is breadth-first when recursive.
pub fn get_files_in(dir: &Path, opts: &ListOptions<'_>) -> Result<Vec<PathBuf>> {
    let exts: Vec<String> = opts.exts.iter().map(|e| e.to_lowercase()).collect();
    let mut files = Vec::new();
    for entry in walk(dir, opts.recursive)? {
        if !entry.is_file() {
            continue;
        }
        if !exts.is_empty() {
            let lower = entry.to_string_lossy().to_lowercase();
            if !exts.iter().any(|e| lower.ends_with(e.as_str())) {
                continue;
            }
        }
        files.push(finish(entry, opts.absolute));
    }
    Ok(files)
}

/// Directories in `dir` (not including `dir` itself).
pub fn get_dirs_in(dir: &Path, opts: &ListOptions<'_>) -> Result<Vec<PathBuf>> {
    Ok(walk(dir, opts.recursive)?
        .into_iter()
        .filter(|p| p.is_dir())
        .map(|p| finish(p, opts.absolute))
        .collect())
}

/// Expand a glob pattern. No matches is an empty list, not an error.
pub fn glob_files(pattern: &str) -> Result<Vec<PathBuf>> {
    Ok(glob::glob(pattern)?.filter_map(|r| r.ok()).collect())
}

/// Move `files` into `dir`, keeping their file names.
///
/// Fails with [`Error::PathNotFound`] when `dir` is missing and `create` is false.
pub fn move_files(files: &[PathBuf], dir: &Path, create: bool) -> Result<()> {
    if !dir.is_dir() {
        if create {
            std::fs::create_dir_all(dir)?;
        } else {
            return Err(Error::PathNotFound(dir.to_path_buf()));
        }
    }
    for file in files {
        let name = file
            .file_name()
            .ok_or_else(|| Error::invalid(format!("no file name: {}", file.display())))?;
        let dest = dir.join(name);
        tracing::debug!(from = %file.display(), to = %dest.display(), "moving file");
        std::fs::rename(file, dest)?;
    }
    Ok(())
}

// Breadth-first listing of everything under `dir`, excluding `dir`.
fn walk(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::PathNotFound(dir.to_path_buf()));
    }
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut entries: Vec<(usize, PathBuf)> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth).sort_by_file_name() {
        let entry = entry?;
        entries.push((entry.depth(), entry.into_path()));
    }
    entries.sort_by_key(|(depth, _)| *depth);
    Ok(entries.into_iter().map(|(_, p)| p).collect())
}

fn finish(path: PathBuf, absolute: bool) -> PathBuf {
    if absolute {
        std::path::absolute(&path).unwrap_or(path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tree() -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("a/b")).unwrap();
        std::fs::write(root.join("top.TXT"), "").unwrap();
        std::fs::write(root.join("a/mid.rs"), "").unwrap();
        std::fs::write(root.join("a/b/deep.txt"), "").unwrap();
        temp
    }

    #[test]
    fn test_get_files_recursive_breadth_first() {
        let temp = tree();
        let opts = ListOptions {
            absolute: false,
            ..Default::default()
        };
        let files = get_files_in(temp.path(), &opts).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["top.TXT", "mid.rs", "deep.txt"]);
    }

    #[test]
    fn test_get_files_ext_filter_case_insensitive() {
        let temp = tree();
        let opts = ListOptions {
            exts: &[".txt"],
            ..Default::default()
        };
        let files = get_files_in(temp.path(), &opts).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_get_files_non_recursive() {
        let temp = tree();
        let opts = ListOptions {
            recursive: false,
            ..Default::default()
        };
        assert_eq!(get_files_in(temp.path(), &opts).unwrap().len(), 1);
    }

    #[test]
    fn test_get_dirs_in() {
        let temp = tree();
        let all = get_dirs_in(temp.path(), &ListOptions::default()).unwrap();
        assert_eq!(all.len(), 2);
        let top = get_dirs_in(
            temp.path(),
            &ListOptions {
                recursive: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn test_missing_dir_is_error() {
        let err = get_files_in(Path::new("/nonexistent/dir"), &ListOptions::default());
        assert!(matches!(err, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_mkdir_exist_ok() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("x/y");
        mkdir(&dir, true).unwrap();
        mkdir(&dir, true).unwrap();
        assert!(matches!(mkdir(&dir, false), Err(Error::PathExists(_))));
    }

    #[test]
    fn test_mkdirs() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("dest");
        mkdirs(&dest, &["one", "two"]).unwrap();
        assert!(dest.join("one").is_dir());
        assert!(dest.join("two").is_dir());
    }

    #[test]
    fn test_glob_files() {
        let temp = tree();
        let pattern = format!("{}/a/*.rs", temp.path().display());
        assert_eq!(glob_files(&pattern).unwrap().len(), 1);
        assert!(glob_files("/nonexistent/*.xyz").unwrap().is_empty());
    }

    #[test]
    fn test_move_files() {
        let temp = tree();
        let src = temp.path().join("top.TXT");
        let dest = temp.path().join("moved");
        assert!(move_files(&[src.clone()], &dest, false).is_err());
        move_files(&[src.clone()], &dest, true).unwrap();
        assert!(!src.exists());
        assert!(dest.join("top.TXT").exists());
    }
}
