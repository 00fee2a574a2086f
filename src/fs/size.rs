//! Human-readable byte sizes

use crate::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

const SIZE_NAMES: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)(B|KB|MB|GB|TB)$").expect("valid regex"));

/// Format a byte count, e.g. `1536` -> `"1.5 KB"`. Zero is `"0B"`.
pub fn bytes_readable(size: u64) -> String {
    if size == 0 {
        return "0B".to_string();
    }
    let mut i = 0;
    let mut rest = size;
    while rest >= 1024 && i < SIZE_NAMES.len() - 1 {
        rest /= 1024;
        i += 1;
    }
    let scaled = size as f64 / 1024f64.powi(i as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", format_float(rounded), SIZE_NAMES[i])
}

/// Parse `"1.5 KB"`, `"10mb"` or a bare byte count.
///
/// `kb_size` must be 1000 or 1024.
pub fn readable_size_to_bytes(size: &str, kb_size: u64) -> Result<u64> {
    if kb_size != 1000 && kb_size != 1024 {
        return Err(Error::invalid(format!(
            "invalid kb_size: {}. Must be 1000 or 1024",
            kb_size
        )));
    }

    let size: String = size.to_uppercase().split_whitespace().collect();
    if !size.is_empty() && size.chars().all(|c| c.is_ascii_digit()) {
        return size
            .parse()
            .map_err(|_| Error::invalid(format!("invalid size format: {}", size)));
    }

    let caps = SIZE_RE
        .captures(&size)
        .ok_or_else(|| Error::invalid(format!("invalid size format: {}", size)))?;
    let number: f64 = caps[1]
        .parse()
        .map_err(|_| Error::invalid(format!("invalid size format: {}", size)))?;
    let multiplier = match &caps[2] {
        "B" => 1,
        "KB" => kb_size,
        "MB" => kb_size.pow(2),
        "GB" => kb_size.pow(3),
        "TB" => kb_size.pow(4),
        unit => return Err(Error::invalid(format!("invalid unit: {}", unit))),
    };
    Ok((number * multiplier as f64) as u64)
}

/// Total size of regular files under `dir`. Symlinks are skipped.
pub fn dir_size(dir: &Path) -> Result<u64> {
    let mut total = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            total += entry.metadata()?.len();
        }
    }
    Ok(total)
}

// Python-style float rendering: `1.0`, `1.5`, `1.46`.
fn format_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_bytes_readable() {
        assert_eq!(bytes_readable(0), "0B");
        assert_eq!(bytes_readable(1), "1.0 B");
        assert_eq!(bytes_readable(1024), "1.0 KB");
        assert_eq!(bytes_readable(1536), "1.5 KB");
        assert_eq!(bytes_readable(1500), "1.46 KB");
        assert_eq!(bytes_readable(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn test_readable_size_to_bytes() {
        assert_eq!(readable_size_to_bytes("512", 1024).unwrap(), 512);
        assert_eq!(readable_size_to_bytes("1 KB", 1024).unwrap(), 1024);
        assert_eq!(readable_size_to_bytes("1kb", 1000).unwrap(), 1000);
        assert_eq!(readable_size_to_bytes("1.5 MB", 1024).unwrap(), 1572864);
        assert_eq!(readable_size_to_bytes("2GB", 1000).unwrap(), 2_000_000_000);
    }

    #[test]
    fn test_readable_size_rejects_garbage() {
        assert!(readable_size_to_bytes("lots", 1024).is_err());
        assert!(readable_size_to_bytes("1 XB", 1024).is_err());
        assert!(readable_size_to_bytes("1 KB", 1023).is_err());
    }

    #[test]
    fn test_dir_size() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("a.bin"), vec![0u8; 100]).unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("sub/b.bin"), vec![0u8; 50]).unwrap();
        assert_eq!(dir_size(temp.path()).unwrap(), 150);
    }
}
