//! # texpage
//!
//! LaTeX source to single-page preview compilation.
//!
//! A source string is validated, then handed to remote compilation
//! services in priority order. When none of them succeeds, a local
//! fallback extracts the document structure, lays it out on one page and
//! rasterizes it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use texpage::Texpage;
//!
//! # async fn run() -> texpage::Result<()> {
//! let source = std::fs::read_to_string("paper.tex")?;
//!
//! let artifact = Texpage::new()
//!     .with_remote("https://latex.example.org/compile")
//!     .compile(&source)
//!     .await?;
//! std::fs::write(format!("paper.{}", artifact.extension()), &artifact.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Validation**: required markers, brace and environment balance
//! - **Structure extraction**: title, author, date, abstract, sections,
//!   bibliography and equations
//! - **Local rendering**: greedy wrapping on a fixed page, PNG or SVG output
//! - **Strategy chain**: ordered remote services with a local fallback
//! - **Artifact handles**: explicit acquire and release via [`Session`]

pub mod artifact;
pub mod clock;
pub mod compile;
pub mod error;
pub mod extract;
pub mod layout;
pub mod model;
pub mod render;
pub mod session;
pub mod validate;

// Re-export commonly used types
pub use artifact::{Artifact, ArtifactRef, ArtifactStore};
pub use clock::{Clock, FixedClock, SystemClock};
pub use compile::{
    CompilationResult, CompilationStrategy, CompileOptions, CompileState, Compiler,
    LocalCompiler, RemoteOptions,
};
pub use error::{
    ArtifactError, CompileError, Error, RemoteError, RenderError, Result, ValidationError,
};
pub use extract::StructureExtractor;
pub use layout::{FontMetrics, FontTable, LayoutEngine, LayoutOptions};
pub use model::{
    Alignment, DocumentModel, LayoutLine, PageLayout, Section, SectionLevel, StyleTag,
};
pub use render::{JsonFormat, OutputFormat, PageRenderer, Rasterizer};
pub use session::Session;
pub use validate::validate;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Read a LaTeX source file.
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Extract the document model from a source string.
///
/// # Example
///
/// ```
/// let model = texpage::extract(r"\title{Report}\author{Ada \and Alan}");
/// assert_eq!(model.title, "Report");
/// assert_eq!(model.author, "Ada\nAlan");
/// ```
pub fn extract(source: &str) -> DocumentModel {
    StructureExtractor::new().extract(source)
}

/// Lay out a model with default options.
pub fn layout(model: &DocumentModel) -> PageLayout {
    LayoutEngine::default().layout(model)
}

/// Validate and render a source locally, skipping remote services.
///
/// # Example
///
/// ```
/// use texpage::{render_local, OutputFormat};
///
/// let source = r"\documentclass{article}\begin{document}Hi\end{document}";
/// let png = render_local(source, OutputFormat::Png).unwrap();
/// assert!(png.starts_with(b"\x89PNG"));
/// ```
pub fn render_local(source: &str, format: OutputFormat) -> Result<Vec<u8>> {
    validate(source)?;
    let artifact = LocalCompiler::new(LayoutOptions::default(), format).compile(source)?;
    Ok(artifact.bytes)
}

/// Serialize the extracted model of a source as JSON.
pub fn to_json(source: &str, format: JsonFormat) -> Result<String> {
    render::to_json(&extract(source), format)
}

/// Compile with the default compiler (local fallback only).
pub async fn compile(source: &str) -> Result<Artifact> {
    Ok(Compiler::new().compile(source).await?)
}

/// Builder assembling a `Compiler`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use texpage::{OutputFormat, Texpage};
///
/// let compiler = Texpage::new()
///     .with_compiler("xelatex")
///     .with_timeout(Duration::from_secs(20))
///     .with_format(OutputFormat::Svg)
///     .build()
///     .unwrap();
/// assert!(compiler.has_local_fallback());
/// ```
pub struct Texpage {
    options: CompileOptions,
    compiler: Option<String>,
    timeout: Option<Duration>,
    clock: Arc<dyn Clock>,
}

impl Texpage {
    /// Create a builder with no remotes and local fallback enabled.
    pub fn new() -> Self {
        Self {
            options: CompileOptions::default(),
            compiler: None,
            timeout: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Add a remote endpoint at the lowest priority.
    pub fn with_remote(mut self, endpoint: impl Into<String>) -> Self {
        self.options = self.options.with_remote(RemoteOptions::new(endpoint));
        self
    }

    /// Set the compiler name for every remote endpoint.
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = Some(compiler.into());
        self
    }

    /// Set the transport timeout for every remote endpoint.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the local fallback.
    pub fn remote_only(mut self) -> Self {
        self.options = self.options.with_local_fallback(false);
        self
    }

    /// Drop every remote endpoint and render locally.
    pub fn local_only(mut self) -> Self {
        self.options.remotes.clear();
        self.options = self.options.with_local_fallback(true);
        self
    }

    /// Set the local output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.options = self.options.with_format(format);
        self
    }

    /// Set the local page layout.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Use an explicit clock for dates and the render footer.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Final compile options.
    pub fn options(&self) -> CompileOptions {
        let mut options = self.options.clone();
        for remote in &mut options.remotes {
            if let Some(compiler) = &self.compiler {
                remote.compiler = compiler.clone();
            }
            if let Some(timeout) = self.timeout {
                remote.timeout = Some(timeout);
            }
        }
        options
    }

    /// Build the compiler.
    pub fn build(&self) -> Result<Compiler> {
        Compiler::from_options_with_clock(&self.options(), self.clock.clone())
    }

    /// Build a session around the compiler.
    pub fn session(&self) -> Result<Session> {
        Ok(Session::new(self.build()?))
    }

    /// Build the compiler and compile one source.
    pub async fn compile(self, source: &str) -> Result<Artifact> {
        let compiler = self.build()?;
        Ok(compiler.compile(source).await?)
    }
}

impl Default for Texpage {
    fn default() -> Self {
        Self::new()
    }
}
