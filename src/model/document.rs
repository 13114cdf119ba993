//! Document-level types.

use serde::{Deserialize, Serialize};

/// Title used when the source has no `\title{…}`.
pub const DEFAULT_TITLE: &str = "Document";

/// Semantic view of a LaTeX source, produced by extraction.
///
/// A model lives for one compilation attempt only; nothing caches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Document title (`"Document"` if absent)
    pub title: String,

    /// Author block; one line per author line in the source
    pub author: String,

    /// Date string, with `\today` already resolved
    pub date: String,

    /// Abstract as a single block of plain text
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Sections in source order
    pub sections: Vec<Section>,

    /// Bibliography entries in source order
    pub bibliography: Vec<String>,

    /// Raw display-equation bodies
    pub equations: Vec<String>,
}

impl DocumentModel {
    /// Create an empty model with default field values.
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author: String::new(),
            date: String::new(),
            abstract_text: String::new(),
            sections: Vec::new(),
            bibliography: Vec::new(),
            equations: Vec::new(),
        }
    }

    /// Author lines, skipping blanks.
    pub fn author_lines(&self) -> impl Iterator<Item = &str> {
        self.author.lines().map(str::trim).filter(|l| !l.is_empty())
    }

    /// Number of sections at the given level.
    pub fn section_count(&self, level: SectionLevel) -> usize {
        self.sections.iter().filter(|s| s.level == level).count()
    }

    /// Approximate word count over title, abstract and section bodies.
    pub fn word_count(&self) -> usize {
        let body: usize = self
            .sections
            .iter()
            .map(|s| s.content.split_whitespace().count())
            .sum();
        self.title.split_whitespace().count()
            + self.abstract_text.split_whitespace().count()
            + body
    }

    /// Check if the model carries no body content at all.
    pub fn is_empty(&self) -> bool {
        self.abstract_text.is_empty() && self.sections.is_empty() && self.bibliography.is_empty()
    }
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new()
    }
}

/// A heading with its body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text
    pub title: String,

    /// Body text; paragraphs are separated by a blank line, never empty
    pub content: String,

    /// Heading depth
    pub level: SectionLevel,
}

impl Section {
    /// Create a new section.
    pub fn new(title: impl Into<String>, content: impl Into<String>, level: SectionLevel) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            level,
        }
    }

    /// Paragraph blocks of the body.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Heading depth, limited to the three modelled levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SectionLevel {
    /// `\section`
    Section = 1,
    /// `\subsection`
    Subsection = 2,
    /// `\subsubsection`
    Subsubsection = 3,
}

impl SectionLevel {
    /// Map a heading command name to its level.
    pub fn from_command(name: &str) -> Option<Self> {
        match name.trim_end_matches('*') {
            "section" => Some(SectionLevel::Section),
            "subsection" => Some(SectionLevel::Subsection),
            "subsubsection" => Some(SectionLevel::Subsubsection),
            _ => None,
        }
    }

    /// Numeric depth (1-3).
    pub fn depth(self) -> u8 {
        self as u8
    }
}

impl From<SectionLevel> for u8 {
    fn from(level: SectionLevel) -> Self {
        level.depth()
    }
}

impl TryFrom<u8> for SectionLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SectionLevel::Section),
            2 => Ok(SectionLevel::Subsection),
            3 => Ok(SectionLevel::Subsubsection),
            other => Err(format!("section level must be 1-3, got {}", other)),
        }
    }
}
