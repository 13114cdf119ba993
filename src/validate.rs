//! Structural validation of LaTeX sources.
//!
//! Validation is deliberately shallow: it only checks what every
//! compilation strategy needs before it can produce anything at all.

use crate::error::ValidationError;

/// Document class declaration marker.
pub const DOCUMENT_CLASS: &str = "\\documentclass";
/// Document body start marker.
pub const BEGIN_DOCUMENT: &str = "\\begin{document}";
/// Document body end marker.
pub const END_DOCUMENT: &str = "\\end{document}";

const REQUIRED_MARKERS: [&str; 3] = [DOCUMENT_CLASS, BEGIN_DOCUMENT, END_DOCUMENT];

/// Validate the structure of a LaTeX source.
///
/// Checks run in order and stop at the first failure:
/// 1. the three required markers are present
/// 2. `{` and `}` counts are equal
/// 3. `\begin{` and `\end{` counts are equal (by total, not per name)
///
/// # Example
/// ```
/// use texpage::validate::validate;
///
/// let source = r"\documentclass{article}\begin{document}Hi\end{document}";
/// assert!(validate(source).is_ok());
/// ```
pub fn validate(source: &str) -> Result<(), ValidationError> {
    for marker in REQUIRED_MARKERS {
        if !source.contains(marker) {
            return Err(ValidationError::MissingMarker(marker));
        }
    }

    let (open, close) = count_braces(source);
    if open != close {
        return Err(ValidationError::UnbalancedBraces(open, close));
    }

    let (begins, ends) = count_environments(source);
    if begins != ends {
        return Err(ValidationError::UnbalancedEnvironments(begins, ends));
    }

    Ok(())
}

/// Check if a source passes validation.
pub fn is_valid(source: &str) -> bool {
    validate(source).is_ok()
}

/// Count opening and closing grouping braces.
fn count_braces(source: &str) -> (usize, usize) {
    source.chars().fold((0, 0), |(open, close), c| match c {
        '{' => (open + 1, close),
        '}' => (open, close + 1),
        _ => (open, close),
    })
}

/// Count `\begin{` and `\end{` markers.
fn count_environments(source: &str) -> (usize, usize) {
    (
        source.matches("\\begin{").count(),
        source.matches("\\end{").count(),
    )
}
