//! Compiled artifacts and their caller-owned handles.
//!
//! An [`ArtifactStore`] hands out an [`ArtifactRef`] per registered
//! artifact. Every reference must be released exactly once; using or
//! releasing it again afterwards is an error rather than undefined reuse.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::error::ArtifactError;

/// Binary output of one successful compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Encoded page or document bytes
    pub bytes: Vec<u8>,

    /// MIME type of `bytes`
    pub mime_type: String,

    /// Name of the strategy that produced it
    pub strategy: String,

    /// When the artifact was produced
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    /// Create a new artifact.
    pub fn new(
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
        strategy: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            strategy: strategy.into(),
            created_at,
        }
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the artifact carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Suggested file extension for the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "application/pdf" => "pdf",
            "image/png" => "png",
            "image/svg+xml" => "svg",
            _ => "bin",
        }
    }
}

/// Opaque handle to an artifact held by an `ArtifactStore`.
///
/// A handle is scoped to the store that issued it; other stores report it
/// as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactRef {
    store: u64,
    id: u64,
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "artifact://{}/{}", self.store, self.id)
    }
}

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Owns artifact bytes between acquisition and release.
#[derive(Debug)]
pub struct ArtifactStore {
    id: u64,
    next_id: u64,
    live: HashMap<ArtifactRef, Artifact>,
}

impl ArtifactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            next_id: 0,
            live: HashMap::new(),
        }
    }

    /// Take ownership of an artifact and return its handle.
    pub fn register(&mut self, artifact: Artifact) -> ArtifactRef {
        self.next_id += 1;
        let reference = ArtifactRef {
            store: self.id,
            id: self.next_id,
        };
        log::debug!(
            "Acquired {} ({} bytes, {})",
            reference,
            artifact.len(),
            artifact.mime_type
        );
        self.live.insert(reference, artifact);
        reference
    }

    /// Borrow a live artifact.
    pub fn get(&self, reference: ArtifactRef) -> Result<&Artifact, ArtifactError> {
        self.live
            .get(&reference)
            .ok_or_else(|| self.missing(reference))
    }

    /// Free an artifact. A handle can be released only once.
    pub fn release(&mut self, reference: ArtifactRef) -> Result<Artifact, ArtifactError> {
        let artifact = self
            .live
            .remove(&reference)
            .ok_or_else(|| self.missing(reference))?;
        log::debug!("Released {}", reference);
        Ok(artifact)
    }

    /// Number of artifacts not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Check if a handle is still live.
    pub fn contains(&self, reference: ArtifactRef) -> bool {
        self.live.contains_key(&reference)
    }

    // Ids are issued in increasing order and never reused, so an issued
    // id that is no longer live has been released.
    fn missing(&self, reference: ArtifactRef) -> ArtifactError {
        if reference.store == self.id && reference.id <= self.next_id {
            ArtifactError::Released(reference)
        } else {
            ArtifactError::Unknown(reference)
        }
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}
