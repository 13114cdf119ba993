//! Structure extraction from LaTeX sources.
//!
//! Extraction is best-effort and total: any string yields a
//! `DocumentModel`, with defaults for whatever could not be found.

pub mod rules;
mod sanitize;

pub use sanitize::{
    clean, TextSanitizer, CITATION_TOKEN, EQUATION_TOKEN, MATH_TOKEN, REF_TOKEN,
};

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::model::{DocumentModel, DEFAULT_TITLE};

/// Builds a `DocumentModel` from LaTeX source.
///
/// The extractor holds no state besides its clock, so one value can be
/// shared freely between calls.
#[derive(Clone)]
pub struct StructureExtractor {
    clock: Arc<dyn Clock>,
}

impl StructureExtractor {
    /// Create an extractor that reads the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an extractor with an explicit clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Extract the document model.
    ///
    /// # Example
    /// ```
    /// use texpage::extract::StructureExtractor;
    ///
    /// let model = StructureExtractor::new().extract(r"\title{Notes}\section{A}Text.");
    /// assert_eq!(model.title, "Notes");
    /// assert_eq!(model.sections.len(), 1);
    /// ```
    pub fn extract(&self, source: &str) -> DocumentModel {
        let model = DocumentModel {
            title: rules::extract_title(source).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            author: rules::extract_author(source).unwrap_or_default(),
            date: rules::extract_date(source, self.clock.now()).unwrap_or_default(),
            abstract_text: rules::extract_abstract(source).unwrap_or_default(),
            sections: rules::extract_sections(source),
            bibliography: rules::extract_bibliography(source),
            equations: rules::extract_equations(source),
        };

        log::debug!(
            "Extracted {} sections, {} references, {} equations",
            model.sections.len(),
            model.bibliography.len(),
            model.equations.len()
        );

        model
    }
}

impl Default for StructureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StructureExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureExtractor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::model::SectionLevel;
    use chrono::{TimeZone, Utc};

    fn extractor() -> StructureExtractor {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        StructureExtractor::with_clock(Arc::new(FixedClock::new(now)))
    }

    #[test]
    fn test_extract_empty_input() {
        let model = extractor().extract("");
        assert_eq!(model, DocumentModel::new());
    }

    #[test]
    fn test_extract_minimal_document() {
        let model =
            extractor().extract("\\documentclass{article}\\begin{document}\\end{document}");
        assert_eq!(model.title, "Document");
        assert!(model.sections.is_empty());
        assert!(model.bibliography.is_empty());
    }

    #[test]
    fn test_extract_full_document() {
        let source = r"\documentclass{article}
\title{A \textit{Study}}
\author{Grace Hopper \\ Navy}
\date{\today}
\begin{document}
\maketitle
\begin{abstract}
We study things.
\end{abstract}
\section{Introduction}
Intro text with $x$ and \cite{k}.
\subsection{Background}
Some background.

$$ a^2 + b^2 = c^2 $$
\begin{thebibliography}{1}
\bibitem{k} Knuth.
\end{thebibliography}
\end{document}";

        let model = extractor().extract(source);
        assert_eq!(model.title, "A Study");
        assert_eq!(model.author, "Grace Hopper\nNavy");
        assert_eq!(model.date, "January 2, 2025");
        assert_eq!(model.abstract_text, "We study things.");
        assert_eq!(model.sections.len(), 2);
        assert_eq!(
            model.sections[0].content,
            "Intro text with [Math] and [citation]."
        );
        assert_eq!(model.sections[1].level, SectionLevel::Subsection);
        assert_eq!(
            model.sections[1].content,
            "Some background.\n\n[Equation]"
        );
        assert_eq!(model.bibliography, vec!["Knuth.".to_string()]);
        assert_eq!(model.equations, vec!["a^2 + b^2 = c^2".to_string()]);
    }

    #[test]
    fn test_extract_never_fails_on_garbage() {
        let inputs = [
            "}}}{{{",
            "\\section{",
            "\\section{Unclosed heading",
            "$$ unterminated",
            "\\begin{thebibliography}\\bibitem",
            "\\author{}\\date{}",
            "ünïcödé \\emph{ok}",
        ];
        for input in inputs {
            let model = extractor().extract(input);
            assert!(!model.title.is_empty());
        }
    }
}
