//! Structural checks on JSON documents
//!
//! These are guards against obviously malformed input, not a full schema.
//! Per-variable authoring rules live on [`crate::model::Fiche::validate`].

use crate::error::{FicheError, Result};
use ahash::AHashSet;
use serde_json::Value;

/// Check the minimal shape required by the rest of the pipeline.
///
/// Checks, in order: `meta` present, `prompt` present, `prompt.variables`
/// present and an array. Fails on the first missing field.
pub fn validate(doc: &Value) -> Result<()> {
    if !is_present(doc.get("meta")) {
        return Err(FicheError::MissingField { field: "meta" });
    }
    let prompt = doc
        .get("prompt")
        .filter(|p| is_present(Some(p)))
        .ok_or(FicheError::MissingField { field: "prompt" })?;
    match prompt.get("variables") {
        Some(Value::Array(_)) => Ok(()),
        _ => Err(FicheError::MissingField {
            field: "prompt.variables",
        }),
    }
}

/// Shape check run by the encoder before compaction.
///
/// Requires `meta`, a non-empty `prompt.base` and a `prompt.variables` array
/// whose string ids are unique.
pub fn validate_for_encoding(doc: &Value) -> Result<()> {
    if !is_present(doc.get("meta")) {
        return Err(FicheError::MissingField { field: "meta" });
    }
    if !is_present(doc.get("prompt").and_then(|p| p.get("base"))) {
        return Err(FicheError::MissingField {
            field: "prompt.base",
        });
    }
    if !matches!(
        doc.get("prompt").and_then(|p| p.get("variables")),
        Some(Value::Array(_))
    ) {
        return Err(FicheError::MissingField {
            field: "prompt.variables",
        });
    }
    check_unique_variable_ids(doc)
}

/// Reject documents where two variables share a string `id`.
///
/// Placeholder substitution is keyed by id, so duplicates would make one
/// variable silently shadow another. Documents without a variables array
/// and variables without a string id are ignored here.
pub fn check_unique_variable_ids(doc: &Value) -> Result<()> {
    let Some(Value::Array(variables)) = doc.get("prompt").and_then(|p| p.get("variables")) else {
        return Ok(());
    };

    let mut seen = AHashSet::with_capacity(variables.len());
    for id in variables
        .iter()
        .filter_map(|v| v.get("id").and_then(Value::as_str))
    {
        if !seen.insert(id) {
            return Err(FicheError::DuplicateVariableId { id: id.to_string() });
        }
    }
    Ok(())
}

/// Presence in the loose sense the browser encoder used: `null`, `false`,
/// `0` and `""` count as missing.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
