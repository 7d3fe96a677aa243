//! Constants for the fiche wire format

/// Envelope tag written by the current encoder.
pub const WRAPPER_VERSION: &str = "p1";

/// Synthetic envelope tag assigned to bare base64 payloads on decode.
pub const LEGACY_TAG: &str = "legacy";

/// Envelope field carrying the format tag.
pub const ENVELOPE_TAG_FIELD: &str = "z";

/// Envelope field carrying the base64 payload.
pub const ENVELOPE_DATA_FIELD: &str = "d";

/// Hard cap on the raw (expanded) JSON length, in UTF-16 code units.
pub const MAX_JSON_CHARS: usize = 5000;

/// Soft threshold on the compacted JSON length before compression.
pub const WARN_JSON_CHARS: usize = 3500;

/// Wrapped-string length above which barcode density hurts scan reliability.
pub const ADVISORY_WRAPPER_CHARS: usize = 3000;

/// Maximum length of the prompt template accepted by authoring validation.
pub const MAX_PROMPT_CHARS: usize = 4000;

/// Maximum number of variables in one fiche.
pub const MAX_VARIABLES: usize = 10;

/// Minimum number of distinct options for a `choice` variable.
pub const MIN_CHOICE_OPTIONS: usize = 2;

/// Upper bound on inflated payload size accepted on decode (1 MiB).
pub const MAX_INFLATED_BYTES: usize = 1024 * 1024;

/// Deflate level used by the encoder (maximum compression).
pub const COMPRESSION_LEVEL: u32 = 9;

/// Meta version written when the author leaves it blank.
pub const DEFAULT_META_VERSION: &str = "1.0";

/// Assistants offered when a fiche carries no `ai` block, all at level 3.
pub const DEFAULT_ASSISTANTS: [&str; 3] = ["chatgpt", "perplexity", "mistral"];
