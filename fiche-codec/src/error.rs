//! Error types for the encode/decode pipeline

use fiche_format::FicheError;
use thiserror::Error;

/// Pipeline errors, one variant per failing stage
///
/// Each variant keeps the lower-level cause as its `source`.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The document lacks a field the pipeline needs.
    #[error("Invalid fiche: {0}")]
    Shape(#[source] FicheError),
    /// Raw JSON is over the hard cap, measured before compaction.
    #[error(
        "Fiche too large: {actual} characters (max {max}). \
         Shorten the prompt or remove variables."
    )]
    SizeExceeded {
        /// Raw JSON length
        actual: usize,
        /// Configured maximum
        max: usize,
    },
    /// The compressor failed.
    #[error("Compression failed: {0}")]
    Compression(#[source] std::io::Error),
    /// Scanned input is empty or of an unusable shape.
    #[error("Unreadable code: {reason}")]
    Envelope {
        /// Human-readable reason
        reason: String,
    },
    /// The payload is not valid base64.
    #[error("Corrupt code (invalid base64): {0}")]
    Encoding(#[source] base64::DecodeError),
    /// The payload does not inflate.
    #[error(
        "Corrupt code (decompression failed). \
         It may have been produced by an incompatible version: {0}"
    )]
    Decompression(#[source] std::io::Error),
    /// The inflated payload is not JSON.
    #[error("Corrupt code (invalid structure): {0}")]
    Parse(#[source] serde_json::Error),
    /// The decoded document could not be rebuilt into a fiche.
    #[error("Invalid fiche structure: {0}")]
    Reconstruction(#[source] FicheError),
}

impl CodecError {
    /// Name of the pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            CodecError::Shape(_) => "validation",
            CodecError::SizeExceeded { .. } => "size",
            CodecError::Compression(_) => "compression",
            CodecError::Envelope { .. } => "envelope",
            CodecError::Encoding(_) => "base64",
            CodecError::Decompression(_) => "inflate",
            CodecError::Parse(_) => "json",
            CodecError::Reconstruction(_) => "reconstruction",
        }
    }

    pub(crate) fn envelope(reason: impl Into<String>) -> Self {
        CodecError::Envelope {
            reason: reason.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CodecError>;
