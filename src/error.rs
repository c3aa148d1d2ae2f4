//! Application-wide error types.
//!
//! This module provides the error hierarchy shared across subsystems.
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum (I/O, codec, config)
//! - [`TrackError`]: Why enrichment of a single track stopped
//! - Module-specific errors (e.g., [`EnrichmentError`]) for detailed handling
//!
//! [`EnrichmentError`]: crate::enrichment::EnrichmentError

use std::path::PathBuf;

use crate::enrichment::EnrichmentError;
use crate::validation::Violation;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata reading/writing error
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

/// Why enrichment of one track stopped.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// A catalog lookup failed
    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    /// The tag gate found problems; later steps were not attempted
    #[error("{}", join_violations(.0))]
    Validation(Vec<Violation>),

    /// Fetched image data is not JPEG or PNG
    #[error("invalid picture type: {0}")]
    InvalidPicture(String),

    /// Neither cover art source had an image
    #[error("no cover art found for release {0}")]
    MissingCoverArt(String),

    /// A pipeline step was invoked in a state it must never see
    #[error("contract violation: {0}")]
    Contract(String),

    #[error("cancelled")]
    Cancelled,
}

impl TrackError {
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            TrackError::Cancelled | TrackError::Enrichment(EnrichmentError::Cancelled)
        )
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TagName;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("/path/to/file.flac");
        assert!(err.to_string().contains("/path/to/file.flac"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::metadata("/music/01.flac", "no vorbis comments").context("reading album");
        let msg = err.to_string();
        assert!(msg.contains("reading album"));
        assert!(msg.contains("01.flac"));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk on fire"));
        let with_ctx = result.with_context("writing 01.flac");
        let msg = with_ctx.unwrap_err().to_string();
        assert!(msg.contains("writing 01.flac"));
        assert!(msg.contains("disk on fire"));
    }

    #[test]
    fn test_validation_error_lists_every_violation() {
        let err = TrackError::Validation(vec![
            Violation::NotSingleTagValue {
                tag: TagName::Artist,
                values: vec![],
            },
            Violation::NotSingleTagValue {
                tag: TagName::ArtistSort,
                values: vec![],
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("\"ARTIST\""));
        assert!(msg.contains("\"ARTISTSORT\""));
    }

    #[test]
    fn test_cancelled_detection() {
        assert!(TrackError::Cancelled.is_cancelled());
        assert!(TrackError::Enrichment(EnrichmentError::Cancelled).is_cancelled());
        assert!(!TrackError::MissingCoverArt("x".to_string()).is_cancelled());
    }
}
