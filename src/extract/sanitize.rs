//! LaTeX-to-plain-text sanitization.
//!
//! The stages run in a fixed order; later stages assume earlier ones have
//! already collapsed their forms. Rules that unwrap nested groups run to a
//! fixed point, so `clean(clean(x)) == clean(x)`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

/// Token substituted for display math.
pub const EQUATION_TOKEN: &str = " [Equation] ";
/// Token substituted for inline math.
pub const MATH_TOKEN: &str = " [Math] ";
/// Token substituted for citations.
pub const CITATION_TOKEN: &str = "[citation]";
/// Token substituted for cross-references.
pub const REF_TOKEN: &str = "[ref]";

// Private-use sentinels for masked spans; stripped from input first.
const DISPLAY_MASK: char = '\u{E001}';
const INLINE_MASK: char = '\u{E002}';
const DOLLAR_MASK: char = '\u{E003}';

static SANITIZER: Lazy<TextSanitizer> = Lazy::new(TextSanitizer::new);

/// Clean a LaTeX fragment into plain text using the shared sanitizer.
///
/// # Example
/// ```
/// use texpage::extract::clean;
///
/// let text = clean(r"See \textbf{Table 1} in \cite{knuth84}. % draft");
/// assert_eq!(text, "See Table 1 in [citation].");
/// ```
pub fn clean(text: &str) -> String {
    SANITIZER.clean(text)
}

/// Remove line comments, dropping comment-only lines entirely.
pub(crate) fn strip_comments(text: &str) -> String {
    SANITIZER.strip_comments(text)
}

/// Compiled rule set for LaTeX text cleanup.
pub struct TextSanitizer {
    comment_line: Regex,
    comment_tail: Regex,
    display_math: Regex,
    inline_math: Regex,
    emphasis: Regex,
    href: Regex,
    citation: Regex,
    reference: Regex,
    label: Regex,
    line_break: Regex,
    escaped_char: Regex,
    command_with_arg: Regex,
    bare_command: Regex,
    environment: Regex,
    horizontal_space: Regex,
    space_around_newline: Regex,
    blank_lines: Regex,
}

impl TextSanitizer {
    /// Compile the rule set.
    pub fn new() -> Self {
        Self {
            comment_line: Regex::new(r"(?m)^[ \t]*%.*(?:\n|$)").unwrap(),
            // A `%` after an even run of backslashes starts a comment.
            comment_tail: Regex::new(r"(?m)(^|[^\\])((?:\\\\)*)%.*$").unwrap(),
            display_math: Regex::new(
                r"(?s)\$\$.*?\$\$|\\\[.*?\\\]|\\begin\{(?:equation|align|gather|multline|eqnarray|displaymath)\*?\}.*?\\end\{(?:equation|align|gather|multline|eqnarray|displaymath)\*?\}",
            )
            .unwrap(),
            inline_math: Regex::new(r"(?s)\$[^$]+\$|\\\(.*?\\\)").unwrap(),
            emphasis: Regex::new(
                r"\\(?:textbf|textit|emph|texttt|textsl|textsf|textsc|textrm|underline)\s*\{([^{}]*)\}",
            )
            .unwrap(),
            href: Regex::new(r"\\href\s*\{[^{}]*\}\s*\{([^{}]*)\}").unwrap(),
            citation: Regex::new(
                r"\\(?:cite|citep|citet|citealp|citeauthor|citeyear|parencite|textcite|autocite|footcite)\*?(?:\s*\[[^\]]*\])*\s*\{[^{}]*\}",
            )
            .unwrap(),
            reference: Regex::new(
                r"\\(?:ref|eqref|autoref|cref|Cref|pageref|nameref|vref)\*?\s*\{[^{}]*\}",
            )
            .unwrap(),
            label: Regex::new(r"\\label\s*\{[^{}]*\}").unwrap(),
            line_break: Regex::new(r"\\\\\*?(?:\[[^\]]*\])?").unwrap(),
            escaped_char: Regex::new(r"\\([&#_])").unwrap(),
            command_with_arg: Regex::new(r"\\([a-zA-Z]+)\*?(?:\[[^\]]*\])?\{([^{}]*)\}").unwrap(),
            bare_command: Regex::new(r"\\([a-zA-Z]+)\*?").unwrap(),
            environment: Regex::new(
                r"\\begin\s*\{[^{}]*\}(?:\[[^\]]*\])?|\\end\s*\{[^{}]*\}|\\(?:begin|end)\*?",
            )
            .unwrap(),
            horizontal_space: Regex::new(r"[ \t\r\x0B\x0C~]+").unwrap(),
            space_around_newline: Regex::new(r" ?\n ?").unwrap(),
            blank_lines: Regex::new(r"\n{3,}").unwrap(),
        }
    }

    /// Run the full cleanup chain.
    pub fn clean(&self, text: &str) -> String {
        let mut result: String = text
            .chars()
            .filter(|c| !matches!(*c, DISPLAY_MASK | INLINE_MASK | DOLLAR_MASK))
            .collect();

        // Stage 1: comments
        result = self.strip_comments(&result);

        // Math is masked here so the command rules below never see its
        // contents; the masks become tokens in stage 6.
        result = self.mask_math(&result);

        // Stage 2: inline formatting
        result = replace_to_fixed_point(&self.emphasis, &result, "$1");
        result = replace_to_fixed_point(&self.href, &result, "$1");

        // Stage 3: citations and cross-references
        result = self.citation.replace_all(&result, CITATION_TOKEN).into_owned();
        result = self.reference.replace_all(&result, REF_TOKEN).into_owned();

        // Stage 4: labels
        result = self.label.replace_all(&result, "").into_owned();

        // Stage 5: generic command fallback
        result = self.line_break.replace_all(&result, " ").into_owned();
        result = self.escaped_char.replace_all(&result, "$1").into_owned();
        result = self.unwrap_commands(&result);
        result = self
            .bare_command
            .replace_all(&result, |caps: &Captures| keep_environment_marker(caps, ""))
            .into_owned();

        // Stage 6: math tokens
        result = self.unmask_math(&result);

        // Stage 7: environments
        result = self.environment.replace_all(&result, "").into_owned();
        result = strip_grouping_braces(&result);

        // Stage 8: whitespace
        self.normalize_whitespace(&result)
    }

    fn strip_comments(&self, text: &str) -> String {
        let without_lines = self.comment_line.replace_all(text, "");
        self.comment_tail
            .replace_all(&without_lines, "$1$2")
            .into_owned()
    }

    fn mask_math(&self, text: &str) -> String {
        let text = text.replace("\\$", &DOLLAR_MASK.to_string());
        let text = self
            .display_math
            .replace_all(&text, DISPLAY_MASK.to_string().as_str())
            .into_owned();
        self.inline_math
            .replace_all(&text, INLINE_MASK.to_string().as_str())
            .into_owned()
    }

    fn unmask_math(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                DISPLAY_MASK => result.push_str(EQUATION_TOKEN),
                INLINE_MASK => result.push_str(MATH_TOKEN),
                DOLLAR_MASK => result.push_str("\\$"),
                other => result.push(other),
            }
        }
        result
    }

    fn unwrap_commands(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = self
                .command_with_arg
                .replace_all(&current, |caps: &Captures| {
                    keep_environment_marker(caps, &caps[2])
                })
                .into_owned();
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn normalize_whitespace(&self, text: &str) -> String {
        let text: String = text.nfc().collect();
        let text = self.horizontal_space.replace_all(&text, " ");
        let text = self.space_around_newline.replace_all(&text, "\n");
        let text = self.blank_lines.replace_all(&text, "\n\n");
        text.trim().to_string()
    }
}

impl Default for TextSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// `\begin`/`\end` are left for the environment stage.
fn keep_environment_marker(caps: &Captures, replacement: &str) -> String {
    match &caps[1] {
        "begin" | "end" => caps[0].to_string(),
        _ => replacement.to_string(),
    }
}

fn replace_to_fixed_point(re: &Regex, text: &str, replacement: &str) -> String {
    let mut current = text.to_string();
    while re.is_match(&current) {
        current = re.replace_all(&current, replacement).into_owned();
    }
    current
}

/// Drop unescaped `{` and `}`.
fn strip_grouping_braces(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev = None;
    for c in text.chars() {
        if matches!(c, '{' | '}') && prev != Some('\\') {
            continue;
        }
        result.push(c);
        prev = Some(c);
    }
    result
}
