//! Positioned lines produced by the layout engine.

use serde::{Deserialize, Serialize};

/// Typographic role of a laid-out line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleTag {
    /// Document title
    Title,
    /// One author per line
    Author,
    /// Document date
    Date,
    /// Section heading, also "References"
    Heading1,
    /// Subsection heading, also "Abstract"
    Heading2,
    /// Subsubsection heading
    Heading3,
    /// Paragraph text
    Body,
    /// Numbered bibliography entry
    Reference,
    /// Render timestamp
    Footer,
}

impl StyleTag {
    /// All style tags, in table order.
    pub const ALL: [StyleTag; 9] = [
        StyleTag::Title,
        StyleTag::Author,
        StyleTag::Date,
        StyleTag::Heading1,
        StyleTag::Heading2,
        StyleTag::Heading3,
        StyleTag::Body,
        StyleTag::Reference,
        StyleTag::Footer,
    ];

    /// Heading style for a section depth (1-3).
    pub fn heading(depth: u8) -> Self {
        match depth {
            0 | 1 => StyleTag::Heading1,
            2 => StyleTag::Heading2,
            _ => StyleTag::Heading3,
        }
    }

    /// Check if this is one of the heading styles.
    pub fn is_heading(self) -> bool {
        matches!(
            self,
            StyleTag::Heading1 | StyleTag::Heading2 | StyleTag::Heading3
        )
    }
}

/// Horizontal alignment of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Start at the left margin
    #[default]
    Left,
    /// Centered on the page width
    Center,
}

/// A single line of text at a fixed vertical position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLine {
    /// Text to draw
    pub text: String,

    /// Typographic role
    pub style: StyleTag,

    /// Top of the line box, in pixels from the top of the page
    pub y: f32,
}

impl LayoutLine {
    /// Create a new line.
    pub fn new(text: impl Into<String>, style: StyleTag, y: f32) -> Self {
        Self {
            text: text.into(),
            style,
            y,
        }
    }
}

/// The result of laying out one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page width in pixels
    pub width: u32,

    /// Page height in pixels
    pub height: u32,

    /// Lines in drawing order
    pub lines: Vec<LayoutLine>,

    /// Whether content was dropped at the vertical cutoff
    pub truncated: bool,

    /// Sections that had no line drawn because of the cutoff
    pub omitted_sections: usize,
}

impl PageLayout {
    /// Create an empty layout for a page of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            lines: Vec::new(),
            truncated: false,
            omitted_sections: 0,
        }
    }

    /// Lines with the given style.
    pub fn lines_with_style(&self, style: StyleTag) -> impl Iterator<Item = &LayoutLine> {
        self.lines.iter().filter(move |l| l.style == style)
    }

    /// Plain text of all lines, one per row.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if nothing was laid out.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
