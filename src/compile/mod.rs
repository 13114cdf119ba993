//! Compilation orchestration.
//!
//! A [`Compiler`] validates the source, tries each remote strategy in
//! priority order, and falls back to the local renderer when every remote
//! strategy has failed. Remote failures are logged and swallowed; only the
//! final outcome reaches the caller.
//!
//! # Example
//!
//! ```no_run
//! use texpage::compile::{CompileOptions, Compiler, RemoteOptions};
//!
//! # async fn run() -> texpage::Result<()> {
//! let options = CompileOptions::new()
//!     .with_remote(RemoteOptions::new("https://latex.example.org/compile"));
//! let compiler = Compiler::from_options(&options)?;
//!
//! let source = "\\documentclass{article}\\begin{document}Hi\\end{document}";
//! let artifact = compiler.compile(source).await?;
//! println!("{} bytes from {}", artifact.len(), artifact.strategy);
//! # Ok(())
//! # }
//! ```

mod local;
mod options;
#[cfg(feature = "remote")]
mod remote;
mod result;

pub use local::{LocalCompiler, LOCAL_STRATEGY};
pub use options::{CompileOptions, RemoteOptions, DEFAULT_COMPILER, DEFAULT_MAIN_FILE};
#[cfg(feature = "remote")]
pub use remote::RemoteCompiler;
pub use result::CompilationResult;

use std::sync::Arc;

use async_trait::async_trait;

use crate::artifact::Artifact;
use crate::clock::{Clock, SystemClock};
use crate::error::{CompileError, RemoteError, Result};
use crate::validate::validate;

/// A remote way of turning source into an artifact.
///
/// Implement this trait to plug in another compilation service.
#[async_trait]
pub trait CompilationStrategy: Send + Sync {
    /// Name used in logs and on produced artifacts.
    fn name(&self) -> &str;

    /// Compile already validated source.
    async fn compile(&self, source: &str) -> std::result::Result<Artifact, RemoteError>;
}

/// Position of a `compile` call in the strategy chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileState {
    /// Not started
    Idle,
    /// Checking structural markers
    Validating,
    /// Trying the remote strategy at this index
    Remote(usize),
    /// Running the local renderer
    LocalFallback,
    /// Finished
    Done {
        /// Whether an artifact was produced
        success: bool,
    },
}

/// Runs the strategy chain for one source at a time.
///
/// A `Compiler` keeps no per-call state, so concurrent calls on a shared
/// reference do not interact.
#[derive(Clone)]
pub struct Compiler {
    remotes: Vec<Arc<dyn CompilationStrategy>>,
    local: Option<LocalCompiler>,
}

impl Compiler {
    /// Create a compiler with no remote strategies and the default local
    /// fallback.
    pub fn new() -> Self {
        Self {
            remotes: Vec::new(),
            local: Some(LocalCompiler::default()),
        }
    }

    /// Build a compiler from options, reading the system clock.
    pub fn from_options(options: &CompileOptions) -> Result<Self> {
        Self::from_options_with_clock(options, Arc::new(SystemClock))
    }

    /// Build a compiler from options with an explicit clock.
    pub fn from_options_with_clock(
        options: &CompileOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let mut compiler = Self {
            remotes: Vec::new(),
            local: options.local_fallback.then(|| {
                LocalCompiler::with_clock(options.layout.clone(), options.format, clock)
            }),
        };

        for remote in &options.remotes {
            #[cfg(feature = "remote")]
            compiler.register(Arc::new(RemoteCompiler::new(remote.clone())?));

            #[cfg(not(feature = "remote"))]
            log::warn!(
                "Ignoring remote endpoint {}: built without the `remote` feature",
                remote.endpoint
            );
        }

        Ok(compiler)
    }

    /// Append a strategy at the lowest priority.
    pub fn register(&mut self, strategy: Arc<dyn CompilationStrategy>) {
        self.remotes.push(strategy);
    }

    /// Append a strategy, builder style.
    pub fn with_strategy(mut self, strategy: Arc<dyn CompilationStrategy>) -> Self {
        self.register(strategy);
        self
    }

    /// Replace the local fallback; `None` disables it.
    pub fn with_local(mut self, local: Option<LocalCompiler>) -> Self {
        self.local = local;
        self
    }

    /// Names of the remote strategies, in priority order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.remotes.iter().map(|s| s.name()).collect()
    }

    /// Whether the local fallback is enabled.
    pub fn has_local_fallback(&self) -> bool {
        self.local.is_some()
    }

    /// Compile `source` to an artifact.
    ///
    /// Validation failures return immediately without contacting any
    /// strategy. No strategy is tried twice within one call.
    pub async fn compile(&self, source: &str) -> std::result::Result<Artifact, CompileError> {
        let mut state = CompileState::Idle;

        transition(&mut state, CompileState::Validating);
        if let Err(e) = validate(source) {
            log::debug!("Validation failed: {}", e);
            transition(&mut state, CompileState::Done { success: false });
            return Err(CompileError::Validation(e));
        }

        let mut last_error = None;
        for (index, strategy) in self.remotes.iter().enumerate() {
            transition(&mut state, CompileState::Remote(index));
            match strategy.compile(source).await {
                Ok(artifact) => {
                    log::info!("Compiled with {}", strategy.name());
                    transition(&mut state, CompileState::Done { success: true });
                    return Ok(artifact);
                }
                Err(e) => {
                    log::warn!("Strategy {} failed: {}", strategy.name(), e);
                    last_error = Some(e);
                }
            }
        }

        let Some(local) = &self.local else {
            transition(&mut state, CompileState::Done { success: false });
            return Err(CompileError::AllStrategiesFailed {
                attempts: self.remotes.len(),
                last: last_error,
            });
        };

        transition(&mut state, CompileState::LocalFallback);
        match local.compile(source) {
            Ok(artifact) => {
                log::info!("Compiled with {}", LOCAL_STRATEGY);
                transition(&mut state, CompileState::Done { success: true });
                Ok(artifact)
            }
            Err(e) => {
                log::warn!("Local compilation failed: {}", e);
                transition(&mut state, CompileState::Done { success: false });
                Err(CompileError::LocalCompilationFailed(e))
            }
        }
    }
}

fn transition(state: &mut CompileState, next: CompileState) {
    log::debug!("Compile state {:?} -> {:?}", state, next);
    *state = next;
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("remotes", &self.strategy_names())
            .field("local", &self.local)
            .finish()
    }
}
