//! PNG backend drawing 8x8 bitmap glyphs scaled to each style's size.

use std::io::Cursor;

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{ImageFormat, Rgb, RgbImage};

use super::Rasterizer;
use crate::error::RenderError;
use crate::layout::FontMetrics;
use crate::model::{LayoutLine, StyleTag};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([24, 24, 24]);
const MUTED: Rgb<u8> = Rgb([96, 96, 96]);

/// Largest page edge accepted, in pixels.
const MAX_EDGE: u32 = 16_384;

/// Glyph used for characters outside the bitmap font.
const REPLACEMENT: char = '?';

/// Rasterizes a page into an RGB PNG.
#[derive(Debug, Default)]
pub struct PngRasterizer {
    canvas: Option<RgbImage>,
}

impl PngRasterizer {
    /// Create a backend with no page started.
    pub fn new() -> Self {
        Self::default()
    }

    fn glyph(c: char) -> [u8; 8] {
        BASIC_FONTS
            .get(c)
            .or_else(|| LATIN_FONTS.get(c))
            .or_else(|| BASIC_FONTS.get(REPLACEMENT))
            .unwrap_or([0; 8])
    }

    fn color(style: StyleTag) -> Rgb<u8> {
        match style {
            StyleTag::Footer | StyleTag::Date => MUTED,
            _ => INK,
        }
    }
}

impl Rasterizer for PngRasterizer {
    fn mime_type(&self) -> &'static str {
        "image/png"
    }

    fn begin_page(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 || width > MAX_EDGE || height > MAX_EDGE {
            return Err(RenderError::RasterizationFailed(format!(
                "unsupported page size {}x{}",
                width, height
            )));
        }
        self.canvas = Some(RgbImage::from_pixel(width, height, BACKGROUND));
        Ok(())
    }

    fn draw_line(&mut self, line: &LayoutLine, x: f32, metrics: &FontMetrics) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };

        let cell = metrics.size.round().max(1.0) as i64;
        let color = Self::color(line.style);
        // Center the glyph cell vertically inside the line box.
        let top = (line.y + (metrics.line_height - metrics.size).max(0.0) / 2.0).round() as i64;

        for (i, c) in line.text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let left = (x + i as f32 * metrics.char_width).round() as i64;
            let rows = Self::glyph(c);

            for dy in 0..cell {
                let row = rows[(dy * 8 / cell) as usize];
                for dx in 0..cell {
                    if row >> (dx * 8 / cell) & 1 == 0 {
                        continue;
                    }
                    put(canvas, left + dx, top + dy, color);
                    if metrics.bold {
                        put(canvas, left + dx + 1, top + dy, color);
                    }
                }
            }
        }
    }

    fn finish_page(&mut self) -> Result<Vec<u8>, RenderError> {
        let canvas = self
            .canvas
            .take()
            .ok_or_else(|| RenderError::RasterizationFailed("no page started".to_string()))?;

        let mut bytes = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| RenderError::RasterizationFailed(e.to_string()))?;
        Ok(bytes)
    }
}

fn put(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    canvas.put_pixel(x as u32, y as u32, color);
}
