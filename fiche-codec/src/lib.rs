//! Fiche Codec - round-trip pipeline between fiches and barcode text
//!
//! This crate turns a fiche document into the short string embedded in a
//! QR code and back:
//!
//! - Key compaction (from `fiche-format`)
//! - zlib compression and base64 transport encoding
//! - The versioned `{"z","d"}` envelope, with legacy bare-payload fallback
//! - Size policy: hard cap on raw JSON, advisory threshold on the wrapper
//!
//! The pipeline holds no state; [`encode`] and [`decode`] are pure.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod envelope;
pub mod error;
pub mod pipeline;
pub mod size;
pub mod transform;

// Re-export commonly used types
pub use envelope::{unwrap, Envelope, FormatTag, RawCode};
pub use error::{CodecError, Result};
pub use fiche_format::{Fiche, FicheError, Limits};
pub use pipeline::{
    decode, decode_fiche, decode_with, deserialize, encode, encode_fiche, encode_strict,
    encode_with, inspect, serialize, DecodeOptions, EncodeOptions, EncodeStats, Encoded,
    Inspection, Payload,
};
pub use size::SizeReport;
