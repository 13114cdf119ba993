//! Single-page layout of a `DocumentModel`.
//!
//! The page is filled top to bottom. Once the cursor passes
//! `LayoutOptions::max_content_y`, every remaining line (sections and
//! bibliography alike) is dropped; there is no second page.

mod options;
mod wrap;

pub use options::{FontMetrics, FontTable, LayoutOptions};
pub use wrap::wrap;

use crate::model::{DocumentModel, LayoutLine, PageLayout, StyleTag};

/// Heading drawn above a non-empty abstract.
pub const ABSTRACT_HEADING: &str = "Abstract";
/// Heading drawn above a non-empty bibliography.
pub const REFERENCES_HEADING: &str = "References";

/// Computes line positions for a model.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    options: LayoutOptions,
}

impl LayoutEngine {
    /// Create an engine with the given options.
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Layout options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out the model on one page.
    pub fn layout(&self, model: &DocumentModel) -> PageLayout {
        let mut cursor = Cursor::new(&self.options);

        cursor.paragraph(&model.title, StyleTag::Title, 0.0);
        for line in model.author_lines() {
            cursor.paragraph(line, StyleTag::Author, 0.0);
        }
        if !model.date.is_empty() {
            cursor.paragraph(&model.date, StyleTag::Date, 0.0);
        }
        cursor.advance(self.options.block_gap);

        if !model.abstract_text.is_empty() {
            cursor.heading(ABSTRACT_HEADING, StyleTag::Heading2);
            cursor.paragraph(&model.abstract_text, StyleTag::Body, 0.0);
            cursor.advance(self.options.block_gap);
        }

        let mut omitted_sections = 0;
        for section in &model.sections {
            let drawn = cursor.heading(&section.title, StyleTag::heading(section.level.depth()));
            if !drawn && cursor.is_full() {
                omitted_sections += 1;
                continue;
            }
            for paragraph in section.paragraphs() {
                cursor.paragraph(paragraph, StyleTag::Body, self.options.paragraph_gap);
            }
        }

        if !model.bibliography.is_empty() {
            cursor.heading(REFERENCES_HEADING, StyleTag::Heading1);
            for (i, entry) in model.bibliography.iter().enumerate() {
                let numbered = format!("[{}] {}", i + 1, entry);
                cursor.paragraph(&numbered, StyleTag::Reference, self.options.paragraph_gap);
            }
        }

        let mut page = cursor.finish();
        page.omitted_sections = omitted_sections;
        if page.truncated {
            log::debug!(
                "Layout cut off at {} lines, {} sections omitted",
                page.lines.len(),
                omitted_sections
            );
        }
        page
    }
}

/// Vertical cursor that stops accepting lines past the cutoff.
struct Cursor<'a> {
    options: &'a LayoutOptions,
    y: f32,
    page: PageLayout,
}

impl<'a> Cursor<'a> {
    fn new(options: &'a LayoutOptions) -> Self {
        Self {
            options,
            y: options.margin_top,
            page: PageLayout::new(options.page_width, options.page_height),
        }
    }

    fn is_full(&self) -> bool {
        self.page.truncated
    }

    fn advance(&mut self, amount: f32) {
        if !self.page.truncated {
            self.y += amount;
        }
    }

    /// Emit one line; returns false once the page is full.
    fn push(&mut self, text: String, style: StyleTag) -> bool {
        if self.page.truncated {
            return false;
        }
        if self.y > self.options.max_content_y() {
            self.page.truncated = true;
            return false;
        }
        self.page.lines.push(LayoutLine::new(text, style, self.y));
        self.y += self.options.fonts.get(style).line_height;
        true
    }

    /// Wrap and emit a block, then add `gap`. Returns whether any line was drawn.
    fn paragraph(&mut self, text: &str, style: StyleTag, gap: f32) -> bool {
        let metrics = *self.options.fonts.get(style);
        let mut drawn = false;
        for line in wrap(text, self.options.content_width(), &metrics) {
            drawn |= self.push(line, style);
        }
        self.advance(gap);
        drawn
    }

    fn heading(&mut self, text: &str, style: StyleTag) -> bool {
        self.advance(self.options.heading_space);
        self.paragraph(text, style, 0.0)
    }

    fn finish(self) -> PageLayout {
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Section, SectionLevel};

    fn small_page() -> LayoutOptions {
        LayoutOptions::new()
            .with_page_size(300, 300)
            .with_margins(10.0)
    }

    #[test]
    fn test_layout_default_model() {
        let page = LayoutEngine::default().layout(&DocumentModel::new());
        assert_eq!(page.lines.len(), 1);
        assert_eq!(page.lines[0].text, "Document");
        assert_eq!(page.lines[0].style, StyleTag::Title);
        assert_eq!(page.lines[0].y, 64.0);
        assert!(!page.truncated);
    }

    #[test]
    fn test_layout_order_and_styles() {
        let mut model = DocumentModel::new();
        model.title = "T".into();
        model.author = "A\nB".into();
        model.date = "D".into();
        model.abstract_text = "Abs".into();
        model.sections.push(Section::new("S", "p1\n\np2", SectionLevel::Section));
        model.sections.push(Section::new("Sub", "p3", SectionLevel::Subsection));
        model.bibliography.push("Ref".into());

        let page = LayoutEngine::default().layout(&model);
        let styles: Vec<_> = page.lines.iter().map(|l| (l.style, l.text.as_str())).collect();
        assert_eq!(
            styles,
            vec![
                (StyleTag::Title, "T"),
                (StyleTag::Author, "A"),
                (StyleTag::Author, "B"),
                (StyleTag::Date, "D"),
                (StyleTag::Heading2, "Abstract"),
                (StyleTag::Body, "Abs"),
                (StyleTag::Heading1, "S"),
                (StyleTag::Body, "p1"),
                (StyleTag::Body, "p2"),
                (StyleTag::Heading2, "Sub"),
                (StyleTag::Body, "p3"),
                (StyleTag::Heading1, "References"),
                (StyleTag::Reference, "[1] Ref"),
            ]
        );
    }

    #[test]
    fn test_vertical_advancement() {
        let options = LayoutOptions::default();
        let mut model = DocumentModel::new();
        model.sections.push(Section::new("S", "p1\n\np2", SectionLevel::Section));

        let page = LayoutEngine::new(options.clone()).layout(&model);
        let fonts = &options.fonts;
        let title_y = options.margin_top;
        let heading_y = title_y
            + fonts.get(StyleTag::Title).line_height
            + options.block_gap
            + options.heading_space;
        let p1_y = heading_y + fonts.get(StyleTag::Heading1).line_height;
        let p2_y = p1_y + fonts.get(StyleTag::Body).line_height + options.paragraph_gap;

        let ys: Vec<f32> = page.lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![title_y, heading_y, p1_y, p2_y]);
    }

    #[test]
    fn test_positions_increase_monotonically() {
        let mut model = DocumentModel::new();
        for i in 0..5 {
            model.sections.push(Section::new(
                format!("Section {}", i),
                "word ".repeat(40),
                SectionLevel::Section,
            ));
        }
        let page = LayoutEngine::default().layout(&model);
        for pair in page.lines.windows(2) {
            assert!(pair[1].y > pair[0].y);
        }
    }

    #[test]
    fn test_cutoff_truncates_sections_and_bibliography() {
        let mut model = DocumentModel::new();
        for i in 0..30 {
            model.sections.push(Section::new(
                format!("Section {}", i),
                "Some body text that wraps a little.",
                SectionLevel::Section,
            ));
        }
        model.bibliography.push("Never shown".into());

        let options = small_page();
        let page = LayoutEngine::new(options.clone()).layout(&model);

        assert!(page.truncated);
        assert!(page.omitted_sections > 0);
        assert!(page.lines.iter().all(|l| l.y <= options.max_content_y()));
        assert_eq!(page.lines_with_style(StyleTag::Reference).count(), 0);
        assert!(!page.lines.iter().any(|l| l.text == "References"));
    }

    #[test]
    fn test_omitted_section_count() {
        let mut model = DocumentModel::new();
        for i in 0..40 {
            model
                .sections
                .push(Section::new(format!("S{}", i), "x", SectionLevel::Section));
        }
        let page = LayoutEngine::new(small_page()).layout(&model);
        let drawn_headings = page.lines_with_style(StyleTag::Heading1).count();
        assert_eq!(drawn_headings + page.omitted_sections, 40);
    }

    #[test]
    fn test_body_lines_respect_width() {
        let mut model = DocumentModel::new();
        model.sections.push(Section::new(
            "S",
            "lorem ipsum dolor sit amet ".repeat(30),
            SectionLevel::Section,
        ));
        let options = LayoutOptions::default();
        let page = LayoutEngine::new(options.clone()).layout(&model);
        let body = options.fonts.get(StyleTag::Body);
        for line in page.lines_with_style(StyleTag::Body) {
            assert!(body.text_width(&line.text) <= options.content_width());
        }
        assert!(page.lines_with_style(StyleTag::Body).count() > 1);
    }
}
