//! Page geometry and font metrics.

use crate::model::{Alignment, StyleTag};

/// Metrics for one text style.
///
/// Glyphs are laid out on a fixed-width grid, so a string's width is its
/// character count times `char_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Glyph height in pixels
    pub size: f32,

    /// Horizontal advance per character in pixels
    pub char_width: f32,

    /// Vertical advance per line in pixels
    pub line_height: f32,

    /// Draw with a heavier stroke
    pub bold: bool,

    /// Horizontal alignment
    pub align: Alignment,
}

impl FontMetrics {
    /// Create metrics with a square glyph cell.
    pub const fn new(size: f32, line_height: f32) -> Self {
        Self {
            size,
            char_width: size,
            line_height,
            bold: false,
            align: Alignment::Left,
        }
    }

    /// Make the style bold.
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Center the style horizontally.
    pub const fn centered(mut self) -> Self {
        self.align = Alignment::Center;
        self
    }

    /// Width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

/// Metrics for every `StyleTag`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontTable {
    metrics: [FontMetrics; 9],
}

impl FontTable {
    /// Metrics for a style.
    pub fn get(&self, style: StyleTag) -> &FontMetrics {
        &self.metrics[style as usize]
    }

    /// Replace the metrics for a style.
    pub fn set(&mut self, style: StyleTag, metrics: FontMetrics) {
        self.metrics[style as usize] = metrics;
    }
}

impl Default for FontTable {
    fn default() -> Self {
        // Order follows StyleTag declaration order.
        Self {
            metrics: [
                FontMetrics::new(24.0, 34.0).bold().centered(), // Title
                FontMetrics::new(14.0, 20.0).centered(),        // Author
                FontMetrics::new(12.0, 18.0).centered(),        // Date
                FontMetrics::new(18.0, 26.0).bold(),            // Heading1
                FontMetrics::new(15.0, 22.0).bold(),            // Heading2
                FontMetrics::new(13.0, 20.0).bold(),            // Heading3
                FontMetrics::new(11.0, 16.0),                   // Body
                FontMetrics::new(10.0, 14.0),                   // Reference
                FontMetrics::new(9.0, 12.0).centered(),         // Footer
            ],
        }
    }
}

/// Options for laying out a page.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Page width in pixels
    pub page_width: u32,

    /// Page height in pixels
    pub page_height: u32,

    /// Top margin
    pub margin_top: f32,

    /// Bottom margin
    pub margin_bottom: f32,

    /// Left margin
    pub margin_left: f32,

    /// Right margin
    pub margin_right: f32,

    /// Space reserved above the bottom margin for the render footer
    pub footer_height: f32,

    /// Extra space after each paragraph
    pub paragraph_gap: f32,

    /// Extra space after the front matter and the abstract
    pub block_gap: f32,

    /// Extra space before each heading
    pub heading_space: f32,

    /// Per-style font metrics
    pub fonts: FontTable,
}

impl LayoutOptions {
    /// Create layout options with defaults (A4 at 96 dpi).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, width: u32, height: u32) -> Self {
        self.page_width = width.max(1);
        self.page_height = height.max(1);
        self
    }

    /// Set all four margins.
    pub fn with_margins(mut self, margin: f32) -> Self {
        self.margin_top = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self.margin_right = margin;
        self
    }

    /// Set the paragraph gap.
    pub fn with_paragraph_gap(mut self, gap: f32) -> Self {
        self.paragraph_gap = gap;
        self
    }

    /// Set the space before headings.
    pub fn with_heading_space(mut self, space: f32) -> Self {
        self.heading_space = space;
        self
    }

    /// Override the metrics of one style.
    pub fn with_font(mut self, style: StyleTag, metrics: FontMetrics) -> Self {
        self.fonts.set(style, metrics);
        self
    }

    /// Width available for text.
    pub fn content_width(&self) -> f32 {
        (self.page_width as f32 - self.margin_left - self.margin_right).max(0.0)
    }

    /// Lowest cursor position at which a line may still start.
    pub fn max_content_y(&self) -> f32 {
        self.page_height as f32 - self.margin_bottom - self.footer_height
    }

    /// Baseline position of the render footer.
    pub fn footer_y(&self) -> f32 {
        self.page_height as f32 - self.margin_bottom
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: 794,
            page_height: 1123,
            margin_top: 64.0,
            margin_bottom: 48.0,
            margin_left: 64.0,
            margin_right: 64.0,
            footer_height: 24.0,
            paragraph_gap: 8.0,
            block_gap: 16.0,
            heading_space: 12.0,
            fonts: FontTable::default(),
        }
    }
}
