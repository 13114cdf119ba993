//! Error types for texpage library.

use std::io;
use thiserror::Error;

use crate::artifact::ArtifactRef;

/// Result type alias for texpage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur anywhere in the compilation pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source failed structural validation.
    #[error("Invalid source: {0}")]
    Validation(#[from] ValidationError),

    /// A remote compilation service failed.
    #[error("Remote compilation error: {0}")]
    Remote(#[from] RemoteError),

    /// The local renderer failed.
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// The whole strategy chain failed.
    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),

    /// An artifact handle was misused.
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A remote endpoint could not be parsed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Structural problems found before any compilation attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One of the three required markers is absent.
    #[error("missing required marker {0}")]
    MissingMarker(&'static str),

    /// Open and close brace counts differ.
    #[error("unbalanced braces: {0} opening, {1} closing")]
    UnbalancedBraces(usize, usize),

    /// `\begin` and `\end` counts differ.
    #[error("unbalanced environments: {0} \\begin, {1} \\end")]
    UnbalancedEnvironments(usize, usize),
}

/// Failure of a single remote compilation strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced a response (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned status {status}: {message}")]
    NonSuccessStatus {
        /// HTTP status code
        status: u16,
        /// Newline-joined error-level log messages
        message: String,
    },

    /// The service answered but the payload could not be used.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Failure of the local fallback renderer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The canvas could not be drawn or encoded.
    #[error("rasterization failed: {0}")]
    RasterizationFailed(String),
}

/// Overall outcome of a failed `compile` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Validation failed; no strategy was attempted.
    #[error("{0}")]
    Validation(ValidationError),

    /// Every configured strategy failed and no local fallback was enabled.
    #[error("all {attempts} compilation strategies failed{}", last_error_suffix(.last))]
    AllStrategiesFailed {
        /// Number of strategies attempted
        attempts: usize,
        /// Error reported by the last remote strategy, if any ran
        last: Option<RemoteError>,
    },

    /// Remote strategies were exhausted and the local fallback failed too.
    #[error("local compilation failed: {0}")]
    LocalCompilationFailed(RenderError),
}

fn last_error_suffix(last: &Option<RemoteError>) -> String {
    match last {
        Some(err) => format!(" (last: {})", err),
        None => String::new(),
    }
}

impl CompileError {
    /// Whether retrying the same source could ever succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, CompileError::Validation(_))
    }
}

/// Misuse of an artifact handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    /// The handle was already released.
    #[error("artifact {0} was already released")]
    Released(ArtifactRef),

    /// The handle was never issued by this store.
    #[error("artifact {0} is unknown to this store")]
    Unknown(ArtifactRef),
}
