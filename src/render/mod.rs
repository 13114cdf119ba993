//! Drawing laid-out pages to bytes.
//!
//! `PageRenderer` owns the drawing order (background, lines, footer) and
//! delegates pixels to a [`Rasterizer`] backend. Backends never wrap or
//! reposition text; they draw what the layout computed.

mod json;
mod raster;
mod svg;

pub use json::{to_json, JsonFormat};
pub use raster::PngRasterizer;
pub use svg::SvgRasterizer;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::error::RenderError;
use crate::layout::{FontMetrics, LayoutOptions};
use crate::model::{Alignment, LayoutLine, PageLayout, StyleTag};

/// Footer timestamp format.
pub const FOOTER_FORMAT: &str = "Rendered %Y-%m-%d %H:%M:%S%.6f UTC";

/// A drawing backend for a single page.
pub trait Rasterizer {
    /// MIME type of the encoded output.
    fn mime_type(&self) -> &'static str;

    /// Start a page filled with the background color.
    fn begin_page(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    /// Draw one line with its left edge at `x`.
    fn draw_line(&mut self, line: &LayoutLine, x: f32, metrics: &FontMetrics);

    /// Encode the page.
    fn finish_page(&mut self) -> Result<Vec<u8>, RenderError>;
}

/// Output format of the local renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG raster image
    #[default]
    Png,

    /// SVG vector image
    Svg,
}

impl OutputFormat {
    /// MIME type of this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Svg => "image/svg+xml",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }

    /// Fresh backend for this format.
    pub fn rasterizer(self) -> Box<dyn Rasterizer> {
        match self {
            OutputFormat::Png => Box::new(PngRasterizer::new()),
            OutputFormat::Svg => Box::new(SvgRasterizer::new()),
        }
    }
}

/// Draws a `PageLayout` through a `Rasterizer`, adding the render footer.
#[derive(Clone)]
pub struct PageRenderer {
    options: LayoutOptions,
    clock: Arc<dyn Clock>,
}

impl PageRenderer {
    /// Create a renderer reading the system clock.
    pub fn new(options: LayoutOptions) -> Self {
        Self::with_clock(options, Arc::new(SystemClock))
    }

    /// Create a renderer with an explicit clock.
    pub fn with_clock(options: LayoutOptions, clock: Arc<dyn Clock>) -> Self {
        Self { options, clock }
    }

    /// Render the page with a fresh backend for `format`.
    pub fn render(&self, page: &PageLayout, format: OutputFormat) -> Result<Vec<u8>, RenderError> {
        let mut backend = format.rasterizer();
        self.render_with(page, backend.as_mut())
    }

    /// Render the page through the given backend.
    pub fn render_with(
        &self,
        page: &PageLayout,
        backend: &mut dyn Rasterizer,
    ) -> Result<Vec<u8>, RenderError> {
        backend.begin_page(page.width, page.height)?;

        for line in &page.lines {
            self.draw(backend, line);
        }

        let footer = self.footer_line(self.clock.now());
        self.draw(backend, &footer);

        let bytes = backend.finish_page()?;
        log::debug!(
            "Rendered {} lines to {} bytes of {}",
            page.lines.len(),
            bytes.len(),
            backend.mime_type()
        );
        Ok(bytes)
    }

    fn draw(&self, backend: &mut dyn Rasterizer, line: &LayoutLine) {
        let metrics = self.options.fonts.get(line.style);
        let x = self.line_x(line, metrics);
        backend.draw_line(line, x, metrics);
    }

    fn line_x(&self, line: &LayoutLine, metrics: &FontMetrics) -> f32 {
        match metrics.align {
            Alignment::Left => self.options.margin_left,
            Alignment::Center => {
                let width = metrics.text_width(&line.text);
                ((self.options.page_width as f32 - width) / 2.0).max(0.0)
            }
        }
    }

    fn footer_line(&self, now: DateTime<Utc>) -> LayoutLine {
        let metrics = self.options.fonts.get(StyleTag::Footer);
        LayoutLine::new(
            now.format(FOOTER_FORMAT).to_string(),
            StyleTag::Footer,
            self.options.footer_y() - metrics.line_height,
        )
    }
}

impl std::fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRenderer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
