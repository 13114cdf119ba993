//! Local fallback: extract, lay out and rasterize without a TeX engine.

use std::sync::Arc;

use crate::artifact::Artifact;
use crate::clock::{Clock, SystemClock};
use crate::error::RenderError;
use crate::extract::StructureExtractor;
use crate::layout::{LayoutEngine, LayoutOptions};
use crate::render::{OutputFormat, PageRenderer};

/// Strategy name reported for local artifacts.
pub const LOCAL_STRATEGY: &str = "local";

/// Renders an approximate single-page preview of already validated source.
#[derive(Clone)]
pub struct LocalCompiler {
    extractor: StructureExtractor,
    engine: LayoutEngine,
    renderer: PageRenderer,
    format: OutputFormat,
    clock: Arc<dyn Clock>,
}

impl LocalCompiler {
    /// Create a local compiler on the system clock.
    pub fn new(layout: LayoutOptions, format: OutputFormat) -> Self {
        Self::with_clock(layout, format, Arc::new(SystemClock))
    }

    /// Create a local compiler reading `clock` for dates and the footer.
    pub fn with_clock(layout: LayoutOptions, format: OutputFormat, clock: Arc<dyn Clock>) -> Self {
        Self {
            extractor: StructureExtractor::with_clock(clock.clone()),
            engine: LayoutEngine::new(layout.clone()),
            renderer: PageRenderer::with_clock(layout, clock.clone()),
            format,
            clock,
        }
    }

    /// Output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Run the local pipeline.
    pub fn compile(&self, source: &str) -> Result<Artifact, RenderError> {
        let model = self.extractor.extract(source);
        let page = self.engine.layout(&model);
        let bytes = self.renderer.render(&page, self.format)?;
        Ok(Artifact::new(
            bytes,
            self.format.mime_type(),
            LOCAL_STRATEGY,
            self.clock.now(),
        ))
    }
}

impl Default for LocalCompiler {
    fn default() -> Self {
        Self::new(LayoutOptions::default(), OutputFormat::default())
    }
}

impl std::fmt::Debug for LocalCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCompiler")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    const SOURCE: &str = "\\documentclass{article}\n\\title{Local}\n\\begin{document}\n\\section{One}\nHello.\n\\end{document}";

    fn compiler(format: OutputFormat) -> LocalCompiler {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        LocalCompiler::with_clock(
            LayoutOptions::default(),
            format,
            Arc::new(FixedClock::new(now)),
        )
    }

    #[test]
    fn test_local_png() {
        let artifact = compiler(OutputFormat::Png).compile(SOURCE).unwrap();
        assert_eq!(artifact.mime_type, "image/png");
        assert_eq!(artifact.strategy, LOCAL_STRATEGY);
        assert!(artifact.bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_local_svg_contains_text() {
        let artifact = compiler(OutputFormat::Svg).compile(SOURCE).unwrap();
        let svg = String::from_utf8(artifact.bytes).unwrap();
        assert!(svg.contains(">Local<"));
        assert!(svg.contains(">One<"));
        assert!(svg.contains("Rendered 2024-01-01 00:00:00.000000 UTC"));
    }

    #[test]
    fn test_fixed_clock_is_deterministic() {
        let c = compiler(OutputFormat::Png);
        assert_eq!(c.compile(SOURCE).unwrap().bytes, c.compile(SOURCE).unwrap().bytes);
    }

    #[test]
    fn test_distinct_content_distinct_bytes() {
        let c = compiler(OutputFormat::Png);
        let other = SOURCE.replace("Hello.", "Goodbye.");
        assert_ne!(c.compile(SOURCE).unwrap().bytes, c.compile(&other).unwrap().bytes);
    }
}
