//! Error types for the fiche format

use thiserror::Error;

/// Fiche format error types
#[derive(Debug, Error)]
pub enum FicheError {
    /// A field required by the pipeline is absent or has the wrong type.
    #[error("Missing or invalid field: {field}")]
    MissingField {
        /// Dotted path of the field (e.g. `prompt.variables`)
        field: &'static str,
    },
    /// Two variables share the same identifier.
    #[error("Duplicate variable id '{id}'")]
    DuplicateVariableId {
        /// The repeated identifier
        id: String,
    },
    /// An authoring rule was violated.
    #[error("Invalid fiche: {0}")]
    Invalid(String),
    /// The prompt template is longer than allowed.
    #[error("Prompt too long: {actual} characters (max {max})")]
    PromptTooLong {
        /// Actual template length
        actual: usize,
        /// Configured maximum
        max: usize,
    },
    /// Too many variables were declared.
    #[error("Too many variables: {actual} (max {max})")]
    TooManyVariables {
        /// Declared variable count
        actual: usize,
        /// Configured maximum
        max: usize,
    },
    /// A geolocation value could not be parsed or is out of range.
    #[error("Invalid coordinates '{value}': {reason}")]
    InvalidCoordinates {
        /// The rejected input
        value: String,
        /// Why it was rejected
        reason: &'static str,
    },
    /// Required variables were left empty.
    #[error("Missing required values: {}", .labels.join(", "))]
    MissingValues {
        /// Label (or id) of every empty required variable, in declaration order
        labels: Vec<String>,
    },
    /// The built-in key table maps two long keys to the same short code.
    #[error("Key table maps both '{first}' and '{second}' to '{code}'")]
    DuplicateShortCode {
        /// Short code used twice
        code: String,
        /// First long key
        first: String,
        /// Second long key
        second: String,
    },
    /// JSON conversion failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, FicheError>;
