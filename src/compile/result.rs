//! Caller-facing compilation result.

use crate::artifact::ArtifactRef;
use crate::error::CompileError;

/// Outcome of `Session::compile`.
///
/// Either an artifact handle or an error is present, never both; success
/// is defined as the presence of the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationResult {
    outcome: Result<Produced, CompileError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Produced {
    artifact: ArtifactRef,
    strategy: String,
}

impl CompilationResult {
    /// A successful result holding a live handle.
    pub fn success(artifact: ArtifactRef, strategy: impl Into<String>) -> Self {
        Self {
            outcome: Ok(Produced {
                artifact,
                strategy: strategy.into(),
            }),
        }
    }

    /// A failed result.
    pub fn failure(error: CompileError) -> Self {
        Self {
            outcome: Err(error),
        }
    }

    /// Whether compilation produced an artifact.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Handle of the produced artifact.
    pub fn artifact(&self) -> Option<ArtifactRef> {
        self.outcome.as_ref().ok().map(|p| p.artifact)
    }

    /// Name of the strategy that succeeded.
    pub fn strategy(&self) -> Option<&str> {
        self.outcome.as_ref().ok().map(|p| p.strategy.as_str())
    }

    /// Failure description.
    pub fn error(&self) -> Option<&CompileError> {
        self.outcome.as_ref().err()
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<ArtifactRef, CompileError> {
        self.outcome.map(|p| p.artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{Artifact, ArtifactStore};
    use crate::error::ValidationError;
    use chrono::Utc;

    #[test]
    fn test_success_has_artifact() {
        let mut store = ArtifactStore::new();
        let r = store.register(Artifact::new(vec![1], "image/png", "local", Utc::now()));
        let result = CompilationResult::success(r, "local");

        assert!(result.is_success());
        assert_eq!(result.artifact(), Some(r));
        assert_eq!(result.strategy(), Some("local"));
        assert!(result.error().is_none());
    }

    #[test]
    fn test_failure_has_no_artifact() {
        let result = CompilationResult::failure(CompileError::Validation(
            ValidationError::MissingMarker("\\documentclass"),
        ));

        assert!(!result.is_success());
        assert!(result.artifact().is_none());
        assert!(result.strategy().is_none());
        assert!(result.error().unwrap().is_permanent());
        assert!(result.into_result().is_err());
    }
}
