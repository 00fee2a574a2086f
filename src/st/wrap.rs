/// Greedy word wrap to `width` columns, lines joined by `newline`.
///
/// Runs of whitespace collapse to one space; words longer than `width` are
/// broken.
pub fn wrapped(text: &str, width: usize, newline: &str) -> String {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let sep = usize::from(current_len > 0);
            if current_len + sep + word.len() <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.extend(word.iter());
                current_len += sep + word.len();
                break;
            }
            if word.len() > width {
                let room = if current_len == 0 {
                    width
                } else {
                    width.saturating_sub(current_len + 1)
                };
                if room > 0 {
                    if current_len > 0 {
                        current.push(' ');
                    }
                    current.extend(word.drain(..room));
                }
            }
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines.join(newline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped() {
        assert_eq!(wrapped("the quick brown fox", 10, "\n"), "the quick\nbrown fox");
        assert_eq!(wrapped("a  b\tc", 80, "|"), "a b c");
        assert_eq!(wrapped("", 10, "\n"), "");
    }

    #[test]
    fn test_wrapped_breaks_long_words() {
        assert_eq!(wrapped("abcdefghij", 4, "\n"), "abcd\nefgh\nij");
        assert_eq!(wrapped("hi abcdefgh", 5, "\n"), "hi ab\ncdefg\nh");
    }
}
