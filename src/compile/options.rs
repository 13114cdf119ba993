//! Compilation options.

use std::time::Duration;

use crate::layout::LayoutOptions;
use crate::render::OutputFormat;

/// Compiler name sent to remote services by default.
pub const DEFAULT_COMPILER: &str = "pdflatex";

/// File name of the main resource sent to remote services.
pub const DEFAULT_MAIN_FILE: &str = "main.tex";

/// Settings for one remote compilation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOptions {
    /// Compile endpoint URL
    pub endpoint: String,

    /// Compiler requested from the service
    pub compiler: String,

    /// File name given to the source resource
    pub main_file: String,

    /// Transport timeout; `None` leaves the client default
    pub timeout: Option<Duration>,
}

impl RemoteOptions {
    /// Create options for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            compiler: DEFAULT_COMPILER.to_string(),
            main_file: DEFAULT_MAIN_FILE.to_string(),
            timeout: None,
        }
    }

    /// Set the compiler name.
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Set the main file name.
    pub fn with_main_file(mut self, main_file: impl Into<String>) -> Self {
        self.main_file = main_file.into();
        self
    }

    /// Set the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Options for a `Compiler`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Remote services, in priority order
    pub remotes: Vec<RemoteOptions>,

    /// Whether to fall back to the local renderer
    pub local_fallback: bool,

    /// Output format of the local renderer
    pub format: OutputFormat,

    /// Page layout used by the local renderer
    pub layout: LayoutOptions,
}

impl CompileOptions {
    /// Create options with no remotes and local fallback enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a remote service.
    pub fn with_remote(mut self, remote: RemoteOptions) -> Self {
        self.remotes.push(remote);
        self
    }

    /// Enable or disable the local fallback.
    pub fn with_local_fallback(mut self, enabled: bool) -> Self {
        self.local_fallback = enabled;
        self
    }

    /// Set the local output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the local page layout.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            remotes: Vec::new(),
            local_fallback: true,
            format: OutputFormat::default(),
            layout: LayoutOptions::default(),
        }
    }
}
