//! Temporary-artifact registry.
//!
//! Stages register every temporary file or directory as soon as they create
//! it; one finalization step releases everything registered, on success and
//! failure paths alike, exactly once per artifact. An artifact a stage
//! created but failed to register before erroring is leaked — registration
//! immediately after creation keeps that window as small as it can be.
//! Release may be deferred until after the response has been delivered; the
//! `Drop` impl is the backstop for callers that never finalize explicitly.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Tracks one request's temporary files and directories.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    artifacts: Mutex<Vec<PathBuf>>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path for release. Safe to call with paths that later
    /// disappear on their own.
    pub fn register(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        log::debug!("registered artifact {}", path.display());
        if let Ok(mut artifacts) = self.artifacts.lock() {
            artifacts.push(path);
        }
    }

    /// Number of artifacts currently registered and not yet released.
    pub fn pending(&self) -> usize {
        self.artifacts.lock().map(|a| a.len()).unwrap_or(0)
    }

    /// Release every registered artifact and return how many were removed.
    ///
    /// Artifacts are drained before removal, so each is released at most
    /// once even when finalization runs again. Removal happens in reverse
    /// registration order so files inside a registered directory go before
    /// the directory itself. Failures are logged, never propagated: cleanup
    /// must not mask the pipeline's own result.
    pub fn release_all(&self) -> usize {
        let drained: Vec<PathBuf> = match self.artifacts.lock() {
            Ok(mut artifacts) => artifacts.drain(..).collect(),
            Err(_) => return 0,
        };

        let mut removed = 0;
        for path in drained.iter().rev() {
            if remove_artifact(path) {
                removed += 1;
            }
        }
        removed
    }
}

impl Drop for ArtifactRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}

fn remove_artifact(path: &Path) -> bool {
    let result = match path.metadata() {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        // Already gone (e.g. removed with its parent directory)
        Err(_) => return false,
    };
    match result {
        Ok(()) => {
            log::debug!("released artifact {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("failed to release artifact {}: {}", path.display(), e);
            false
        }
    }
}
