//! SVG backend.

use std::fmt::Write;

use super::Rasterizer;
use crate::error::RenderError;
use crate::layout::FontMetrics;
use crate::model::{LayoutLine, StyleTag};

/// Writes each line as a monospace `<text>` element.
#[derive(Debug, Default)]
pub struct SvgRasterizer {
    document: Option<String>,
}

impl SvgRasterizer {
    /// Create a backend with no page started.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rasterizer for SvgRasterizer {
    fn mime_type(&self) -> &'static str {
        "image/svg+xml"
    }

    fn begin_page(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::RasterizationFailed(format!(
                "unsupported page size {}x{}",
                width, height
            )));
        }
        let mut doc = String::new();
        let _ = writeln!(
            doc,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        );
        doc.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
        self.document = Some(doc);
        Ok(())
    }

    fn draw_line(&mut self, line: &LayoutLine, x: f32, metrics: &FontMetrics) {
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        let fill = match line.style {
            StyleTag::Footer | StyleTag::Date => "#606060",
            _ => "#181818",
        };
        let weight = if metrics.bold { "bold" } else { "normal" };
        // SVG text is positioned by baseline.
        let baseline = line.y + (metrics.line_height + metrics.size) / 2.0;
        let _ = writeln!(
            doc,
            r#"<text x="{:.1}" y="{:.1}" font-family="monospace" font-size="{:.1}" font-weight="{}" fill="{}">{}</text>"#,
            x,
            baseline,
            metrics.size,
            weight,
            fill,
            escape(&line.text)
        );
    }

    fn finish_page(&mut self) -> Result<Vec<u8>, RenderError> {
        let mut doc = self
            .document
            .take()
            .ok_or_else(|| RenderError::RasterizationFailed("no page started".to_string()))?;
        doc.push_str("</svg>\n");
        Ok(doc.into_bytes())
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_page() {
        let mut backend = SvgRasterizer::new();
        backend.begin_page(100, 50).unwrap();
        backend.draw_line(
            &LayoutLine::new("a < b & c", StyleTag::Body, 10.0),
            5.0,
            &FontMetrics::new(10.0, 14.0),
        );
        let svg = String::from_utf8(backend.finish_page().unwrap()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(svg.contains(r#"x="5.0" y="22.0""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_bold() {
        let mut backend = SvgRasterizer::new();
        backend.begin_page(100, 50).unwrap();
        backend.draw_line(
            &LayoutLine::new("H", StyleTag::Heading1, 0.0),
            0.0,
            &FontMetrics::new(10.0, 14.0).bold(),
        );
        let svg = String::from_utf8(backend.finish_page().unwrap()).unwrap();
        assert!(svg.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn test_svg_requires_page() {
        assert!(SvgRasterizer::new().finish_page().is_err());
        assert!(SvgRasterizer::new().begin_page(0, 0).is_err());
    }
}
