//! File name sanitizing and generation

use crate::st::remove;
use chrono::Local;
use rand::Rng;

/// Strip characters that are not allowed in file names on common platforms.
/// Double quotes become single quotes.
pub fn safe_filename(name: &str) -> String {
    remove(&name.replace('"', "'"), "<>:\"/|?*\\“”;", "")
}

/// Like [`safe_filename`] but keeps path separators.
pub fn safe_filepath(path: &str) -> String {
    remove(path, "<>\"|?*“”;", "")
}

/// Random file name: `prefix.NNNNNNNNNN[.YYYY-mm-dd.HH-MM-SS-mmm][.ext]`.
pub fn rand_filename(prefix: &str, ext: &str, include_datetime: bool) -> String {
    let ext = match ext {
        "" => String::new(),
        e if e.starts_with('.') => e.to_string(),
        e => format!(".{}", e),
    };
    let num: u64 = rand::thread_rng().gen_range(1_000_000_000..=9_999_999_999);
    let name = if include_datetime {
        let created = Local::now().format("%Y-%m-%d.%H-%M-%S-%3f");
        format!("{}.{}.{}{}", prefix, num, created, ext)
    } else {
        format!("{}.{}{}", prefix, num, ext)
    };
    safe_filename(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("a<b>c:d|e?f*g"), "abcdefg");
        assert_eq!(safe_filename("say \"hi\".txt"), "say 'hi'.txt");
        assert_eq!(safe_filename("dir/file"), "dirfile");
    }

    #[test]
    fn test_safe_filepath_keeps_separators() {
        assert_eq!(safe_filepath("/tmp/a?b.txt"), "/tmp/ab.txt");
    }

    #[test]
    fn test_rand_filename_shape() {
        let name = rand_filename("file", "txt", false);
        assert!(name.starts_with("file."));
        assert!(name.ends_with(".txt"));
        assert_eq!(name.len(), "file.".len() + 10 + ".txt".len());

        let with_dt = rand_filename("log", ".json", true);
        assert!(with_dt.starts_with("log."));
        assert!(with_dt.ends_with(".json"));
        assert!(with_dt.len() > name.len());
    }
}
