//! Size limits and thresholds

use crate::constants;
use serde::Deserialize;

/// Thresholds applied by the pipeline and by authoring validation
///
/// The hard JSON cap and the advisory wrapper threshold are independent and
/// measured at different stages: raw JSON before compaction versus the final
/// wrapped string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Maximum raw JSON length before compaction (default: 5,000)
    pub max_json_chars: usize,
    /// Compacted JSON length that triggers a warning (default: 3,500)
    pub warn_json_chars: usize,
    /// Wrapped string length that requires caller confirmation (default: 3,000)
    pub advisory_wrapper_chars: usize,
    /// Maximum prompt template length (default: 4,000)
    pub max_prompt_chars: usize,
    /// Maximum variables per fiche (default: 10)
    pub max_variables: usize,
    /// Maximum inflated payload size on decode (default: 1 MiB)
    pub max_inflated_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_json_chars: constants::MAX_JSON_CHARS,
            warn_json_chars: constants::WARN_JSON_CHARS,
            advisory_wrapper_chars: constants::ADVISORY_WRAPPER_CHARS,
            max_prompt_chars: constants::MAX_PROMPT_CHARS,
            max_variables: constants::MAX_VARIABLES,
            max_inflated_bytes: constants::MAX_INFLATED_BYTES,
        }
    }
}

/// Length of `text` in UTF-16 code units.
///
/// Thresholds are expressed in this unit so that codes produced by the
/// browser encoder hit the same boundaries.
pub fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}
