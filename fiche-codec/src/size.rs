//! Size policy
//!
//! Two independent checks at different stages: a hard cap on the raw JSON
//! before compaction, and an advisory threshold on the final wrapped string
//! above which barcode density makes scanning unreliable. Crossing the
//! advisory threshold is the caller's decision to make; the pipeline only
//! reports it.

use crate::error::{CodecError, Result};
use fiche_format::{text_len, Limits};
use serde::Serialize;

/// Advisory assessment of a wrapped string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeReport {
    /// Wrapped string length
    pub wrapper_length: usize,
    /// Threshold it was compared against
    pub advisory_threshold: usize,
    /// Whether the caller should confirm before producing the barcode
    pub exceeds_advisory: bool,
}

impl SizeReport {
    /// Assess a wrapped string against `limits`.
    pub fn assess(wrapper: &str, limits: &Limits) -> Self {
        Self::from_length(text_len(wrapper), limits)
    }

    /// Assess a precomputed wrapped length against `limits`.
    pub fn from_length(wrapper_length: usize, limits: &Limits) -> Self {
        Self {
            wrapper_length,
            advisory_threshold: limits.advisory_wrapper_chars,
            exceeds_advisory: wrapper_length > limits.advisory_wrapper_chars,
        }
    }
}

/// Enforce the hard cap on raw JSON length.
pub fn check_raw_length(raw_length: usize, limits: &Limits) -> Result<()> {
    if raw_length > limits.max_json_chars {
        return Err(CodecError::SizeExceeded {
            actual: raw_length,
            max: limits.max_json_chars,
        });
    }
    Ok(())
}

/// Whether compacted JSON is past the soft threshold. Logs a warning if so.
pub fn is_dense(compact_length: usize, limits: &Limits) -> bool {
    let dense = compact_length > limits.warn_json_chars;
    if dense {
        tracing::warn!(
            compact_length,
            threshold = limits.warn_json_chars,
            "large fiche, the barcode will be dense and hard to scan"
        );
    }
    dense
}
