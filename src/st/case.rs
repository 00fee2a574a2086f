//! Identifier case conversion

use regex::Regex;
use std::sync::LazyLock;

static UPPER_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([A-Z]+)").expect("valid regex"));
static CAPITALIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([A-Z][a-z]+)").expect("valid regex"));
static DELIM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[_-]+").expect("valid regex"));

/// `"FooBar"`, `"foo-bar"`, `"FOO BAR"` -> `"foo_bar"`. A leading underscore
/// is preserved.
pub fn snake_case(s: &str) -> String {
    let s = s.replace('-', " ");
    let s = UPPER_RUN_RE.replace_all(&s, " $1");
    let s = CAPITALIZED_RE.replace_all(&s, " $1");
    s.split_whitespace().collect::<Vec<_>>().join("_").to_lowercase()
}

/// `"foo_bar"`, `"foo-bar"`, `"foo _ _ BAR"` -> `"fooBar"`.
pub fn camel_case(s: &str) -> String {
    let titled = title(&DELIM_RE.replace_all(s, " "));
    let joined: String = titled.chars().filter(|c| *c != ' ').collect();
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// Uppercase the first letter of every run of letters, lowercase the rest.
fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// `"fooBar"`, `"foo_bar"`, `"HTTPServer"` -> `"foo-bar"`, `"foo-bar"`, `"http-server"`.
pub fn kebab_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut spaced = String::with_capacity(s.len() * 2);
    let mut i = 0;
    while i < chars.len() {
        match word_at(&chars, i) {
            Some(end) => {
                spaced.push(' ');
                spaced.extend(chars[i..end].iter().map(|c| c.to_ascii_lowercase()));
                i = end;
            }
            None => {
                spaced.push(chars[i]);
                i += 1;
            }
        }
    }
    spaced
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// End of the word starting at `i`, trying in order: an acronym followed by a
// capitalized word or a word boundary, an optionally capitalized lowercase
// run with trailing digits, a lone capital, a digit run.
fn word_at(chars: &[char], i: usize) -> Option<usize> {
    let run = |from: usize, pred: fn(&char) -> bool| {
        chars[from..].iter().take_while(|c| pred(c)).count()
    };

    let upper = run(i, char::is_ascii_uppercase);
    for len in (2..=upper).rev() {
        let next = i + len;
        let boundary = chars.get(next).is_none_or(|c| !is_word_char(*c));
        let capitalized = chars.get(next).is_some_and(char::is_ascii_uppercase)
            && run(next + 1, char::is_ascii_lowercase) > 0;
        if boundary || capitalized {
            return Some(next);
        }
    }

    let start = if upper > 0 { i + 1 } else { i };
    let lower = run(start, char::is_ascii_lowercase);
    if lower > 0 {
        let end = start + lower;
        return Some(end + run(end, char::is_ascii_digit));
    }
    if upper > 0 {
        return Some(i + 1);
    }
    let digits = run(i, char::is_ascii_digit);
    (digits > 0).then_some(i + digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("FooBar"), "foo_bar");
        assert_eq!(snake_case("Foo-Bar"), "foo_bar");
        assert_eq!(snake_case("fooBar"), "foo_bar");
        assert_eq!(snake_case("FOO BAR"), "foo_bar");
        assert_eq!(snake_case("_fooBar"), "_foo_bar");
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("foo_bar"), "foo-bar");
        assert_eq!(kebab_case("foo____bar"), "foo-bar");
        assert_eq!(kebab_case("foo bar"), "foo-bar");
        assert_eq!(kebab_case("foo   bar"), "foo-bar");
        assert_eq!(kebab_case("fooBar"), "foo-bar");
        assert_eq!(kebab_case("HTTPServer"), "http-server");
        assert_eq!(kebab_case("version2Update"), "version2-update");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("foo_bar"), "fooBar");
        assert_eq!(camel_case("foo-bar"), "fooBar");
        assert_eq!(camel_case("foo______BAR"), "fooBar");
        assert_eq!(camel_case("foo______   BAR"), "fooBar");
        assert_eq!(camel_case("foo _ _ BAR"), "fooBar");
        assert_eq!(camel_case(""), "");
    }
}
