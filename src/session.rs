//! Caller-facing compile and release API.

use crate::artifact::{Artifact, ArtifactRef, ArtifactStore};
use crate::compile::{CompilationResult, Compiler};
use crate::error::ArtifactError;

/// Pairs a `Compiler` with the store that owns its artifacts.
///
/// Every handle returned by [`Session::compile`] must be passed to
/// [`Session::release_artifact`] exactly once. [`Session::preview`] manages
/// a single current handle on the caller's behalf.
#[derive(Debug, Default)]
pub struct Session {
    compiler: Compiler,
    store: ArtifactStore,
    current: Option<ArtifactRef>,
}

impl Session {
    /// Create a session around a compiler.
    pub fn new(compiler: Compiler) -> Self {
        Self {
            compiler,
            store: ArtifactStore::new(),
            current: None,
        }
    }

    /// Compiler in use.
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Compile and acquire a handle to the artifact.
    pub async fn compile(&mut self, source: &str) -> CompilationResult {
        match self.compiler.compile(source).await {
            Ok(artifact) => {
                let strategy = artifact.strategy.clone();
                let reference = self.store.register(artifact);
                CompilationResult::success(reference, strategy)
            }
            Err(e) => CompilationResult::failure(e),
        }
    }

    /// Borrow the artifact behind a live handle.
    pub fn artifact(&self, reference: ArtifactRef) -> Result<&Artifact, ArtifactError> {
        self.store.get(reference)
    }

    /// Release a handle. Releasing twice is an error.
    pub fn release_artifact(&mut self, reference: ArtifactRef) -> Result<Artifact, ArtifactError> {
        if self.current == Some(reference) {
            self.current = None;
        }
        self.store.release(reference)
    }

    /// Compile and make the result the current preview.
    ///
    /// On success the previous preview is released right after the new
    /// artifact is acquired. On failure the previous preview stays current.
    pub async fn preview(&mut self, source: &str) -> CompilationResult {
        let result = self.compile(source).await;
        if let Some(new) = result.artifact() {
            if let Some(old) = self.current.replace(new) {
                if let Err(e) = self.store.release(old) {
                    log::warn!("Previous preview already gone: {}", e);
                }
            }
        }
        result
    }

    /// Handle of the current preview.
    pub fn current(&self) -> Option<ArtifactRef> {
        self.current
    }

    /// Number of handles not yet released.
    pub fn live_artifacts(&self) -> usize {
        self.store.live_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "\\documentclass{article}\\begin{document}Hi\\end{document}";

    #[tokio::test]
    async fn test_compile_and_release_once() {
        let mut session = Session::default();
        let result = session.compile(VALID).await;
        let r = result.artifact().unwrap();

        assert!(session.artifact(r).is_ok());
        assert!(session.release_artifact(r).is_ok());
        assert_eq!(
            session.release_artifact(r).unwrap_err(),
            ArtifactError::Released(r)
        );
        assert!(session.artifact(r).is_err());
        assert_eq!(session.live_artifacts(), 0);
    }

    #[tokio::test]
    async fn test_failed_compile_acquires_nothing() {
        let mut session = Session::default();
        let result = session.compile("plain text").await;
        assert!(!result.is_success());
        assert_eq!(session.live_artifacts(), 0);
    }

    #[tokio::test]
    async fn test_preview_replaces_and_releases() {
        let mut session = Session::default();

        let first = session.preview(VALID).await.artifact().unwrap();
        let second = session.preview(VALID).await.artifact().unwrap();

        assert_eq!(session.current(), Some(second));
        assert_eq!(session.live_artifacts(), 1);
        assert_eq!(
            session.artifact(first).unwrap_err(),
            ArtifactError::Released(first)
        );
    }

    #[tokio::test]
    async fn test_preview_failure_keeps_previous() {
        let mut session = Session::default();
        let first = session.preview(VALID).await.artifact().unwrap();

        let result = session.preview("broken").await;
        assert!(!result.is_success());
        assert_eq!(session.current(), Some(first));
        assert!(session.artifact(first).is_ok());
    }

    #[tokio::test]
    async fn test_handle_from_other_session_is_rejected() {
        let mut first = Session::default();
        let mut second = Session::default();
        let ours = first.compile(VALID).await.artifact().unwrap();
        let theirs = second.compile(VALID).await.artifact().unwrap();

        assert_eq!(
            second.release_artifact(ours).unwrap_err(),
            ArtifactError::Unknown(ours)
        );
        assert!(second.artifact(theirs).is_ok());
        assert_eq!(second.live_artifacts(), 1);
        assert!(first.release_artifact(ours).is_ok());
    }
}
