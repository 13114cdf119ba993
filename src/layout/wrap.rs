//! Greedy word wrapping.

use super::FontMetrics;

/// Break `text` into lines no wider than `max_width`.
///
/// Words are appended to the current line while they fit; a word that does
/// not fit starts the next line. A word wider than `max_width` on its own
/// gets a line to itself, unbroken.
pub fn wrap(text: &str, max_width: f32, metrics: &FontMetrics) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate_width =
            metrics.text_width(&current) + metrics.char_width + metrics.text_width(word);
        if candidate_width > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current.push(' ');
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> FontMetrics {
        FontMetrics::new(10.0, 12.0)
    }

    #[test]
    fn test_wrap_fits_on_one_line() {
        assert_eq!(wrap("hello world", 200.0, &metrics()), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_breaks_greedily() {
        // 10 chars per line.
        let lines = wrap("aaa bbb ccc ddd", 100.0, &metrics());
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_exact_fit_stays_on_line() {
        let lines = wrap("aaaa bbbbb", 100.0, &metrics());
        assert_eq!(lines, vec!["aaaa bbbbb"]);
    }

    #[test]
    fn test_long_word_gets_own_line() {
        let lines = wrap("a supercalifragilistic b", 100.0, &metrics());
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_whitespace_only() {
        assert!(wrap("   \n\t ", 100.0, &metrics()).is_empty());
        assert!(wrap("", 100.0, &metrics()).is_empty());
    }

    #[test]
    fn test_no_line_exceeds_width_unless_single_word() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
                    eiusmod tempor incididunt ut labore et dolore magna aliqua. \
                    Pneumonoultramicroscopicsilicovolcanoconiosis ends here.";
        let m = metrics();
        for width in [30.0, 55.0, 80.0, 120.0, 250.0, 400.0] {
            for line in wrap(text, width, &m) {
                let single_word = !line.contains(' ');
                assert!(
                    m.text_width(&line) <= width || single_word,
                    "line {:?} exceeds {}",
                    line,
                    width
                );
            }
        }
    }

    #[test]
    fn test_wrap_preserves_words_in_order() {
        let text = "one two three four five six seven";
        let lines = wrap(text, 60.0, &metrics());
        assert_eq!(lines.join(" "), text);
    }
}
