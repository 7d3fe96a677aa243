//! Fiche Format - Core primitives for compact prompt fiches
//!
//! This crate provides the building blocks shared by the encoder and the
//! decoder, with no I/O dependencies. It includes:
//!
//! - Wire constants and thresholds
//! - Error types
//! - Size limits
//! - The key compaction table
//! - Structural validation of JSON documents
//! - The typed fiche model and its authoring rules
//! - Geolocation values

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod geoloc;
pub mod keymap;
pub mod limits;
pub mod model;
pub mod schema;

// Re-export commonly used types
pub use error::{FicheError, Result};
pub use geoloc::Coordinates;
pub use keymap::{compact, expand, KeyTable};
pub use limits::{text_len, Limits};
pub use model::{
    default_ai_levels, parse_options, AiLevels, ConfidenceLevel, Fiche, Meta, Prompt, Variable,
    VariableType,
};
