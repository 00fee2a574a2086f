//! Character filters

/// Remove every char of `chars` from `s`, or replace it with `replace_with`.
pub fn remove(s: &str, chars: &str, replace_with: &str) -> String {
    filter(s, |c| !chars.contains(c), replace_with)
}

/// Keep only chars of `chars`; the rest are dropped or replaced with `replace_with`.
pub fn keep(s: &str, chars: &str, replace_with: &str) -> String {
    filter(s, |c| chars.contains(c), replace_with)
}

fn filter(s: &str, keep: impl Fn(char) -> bool, replace_with: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if keep(c) {
            out.push(c);
        } else {
            out.push_str(replace_with);
        }
    }
    out
}

/// Drop characters that are not allowed in a file name.
pub fn filter_filename(name: &str, replace_with: &str) -> String {
    remove(name, "|?*<>:\"\\", replace_with)
}

/// Drop characters that are not allowed in a file path. The final component
/// is filtered like [`filter_filename`]; directory separators are kept.
pub fn filter_filepath(path: &str, replace_with: &str) -> String {
    match path.rsplit_once(std::path::MAIN_SEPARATOR) {
        Some((dir, file)) => format!(
            "{}{}{}",
            remove(dir, "|?*<>:\"", ""),
            std::path::MAIN_SEPARATOR,
            filter_filename(file, replace_with)
        ),
        None => filter_filename(path, replace_with),
    }
}

/// Drop or replace non-ASCII characters.
pub fn filter_ascii(s: &str, replace_with: &str) -> String {
    filter(s, |c| c.is_ascii(), replace_with)
}
