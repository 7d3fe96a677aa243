//! Barcode envelope
//!
//! The string embedded in a barcode is `{"z":"<tag>","d":"<base64>"}`.
//! Earlier generations embedded the bare base64 payload, so unwrapping
//! normalizes every accepted input shape into one [`Envelope`].

use crate::error::{CodecError, Result};
use fiche_format::constants::{
    ENVELOPE_DATA_FIELD, ENVELOPE_TAG_FIELD, LEGACY_TAG, WRAPPER_VERSION,
};
use serde_json::{Map, Value};
use std::fmt;

/// Format tag carried in the `z` field
///
/// The tag is informational: every tag decodes with the same pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormatTag {
    /// `p1`, written by the current encoder
    Current,
    /// Bare base64 with no envelope
    Legacy,
    /// JSON envelope without a `z` field
    Untagged,
    /// Any other tag value
    Other(String),
}

impl FormatTag {
    /// Classify a wire tag.
    pub fn from_wire(tag: Option<&str>) -> Self {
        match tag {
            None => FormatTag::Untagged,
            Some(WRAPPER_VERSION) => FormatTag::Current,
            Some(LEGACY_TAG) => FormatTag::Legacy,
            Some(other) => FormatTag::Other(other.to_string()),
        }
    }

    /// The tag as written on the wire, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormatTag::Current => Some(WRAPPER_VERSION),
            FormatTag::Legacy => Some(LEGACY_TAG),
            FormatTag::Untagged => None,
            FormatTag::Other(tag) => Some(tag),
        }
    }

    /// Whether this decoder knows the tag.
    pub fn is_known(&self) -> bool {
        matches!(self, FormatTag::Current | FormatTag::Legacy)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("<none>"))
    }
}

/// Normalized `{ tag, payload }` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Format tag
    pub tag: FormatTag,
    /// Base64 payload
    pub payload: String,
}

impl Envelope {
    /// Wrap a payload with the current format tag.
    pub fn wrap(payload: impl Into<String>) -> Self {
        Self {
            tag: FormatTag::Current,
            payload: payload.into(),
        }
    }

    /// Envelope as a JSON object, `z` first.
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(2);
        if let Some(tag) = self.tag.as_str() {
            object.insert(ENVELOPE_TAG_FIELD.to_string(), Value::from(tag));
        }
        object.insert(
            ENVELOPE_DATA_FIELD.to_string(),
            Value::from(self.payload.as_str()),
        );
        Value::Object(object)
    }

    /// The literal string placed in the barcode.
    pub fn to_wire_string(&self) -> String {
        self.to_value().to_string()
    }

    /// Whether this envelope was synthesized from a bare payload.
    pub fn is_legacy(&self) -> bool {
        self.tag == FormatTag::Legacy
    }
}

/// Raw input handed to the decoder
///
/// Barcode readers should pass [`RawCode::Text`]; the text may or may not
/// be JSON, so callers must not parse it themselves.
#[derive(Debug, Clone, Copy)]
pub enum RawCode<'a> {
    /// Text exactly as read from the barcode
    Text(&'a str),
    /// An already-parsed JSON value
    Json(&'a Value),
}

impl<'a> From<&'a str> for RawCode<'a> {
    fn from(text: &'a str) -> Self {
        RawCode::Text(text)
    }
}

impl<'a> From<&'a String> for RawCode<'a> {
    fn from(text: &'a String) -> Self {
        RawCode::Text(text.as_str())
    }
}

impl<'a> From<&'a Value> for RawCode<'a> {
    fn from(value: &'a Value) -> Self {
        RawCode::Json(value)
    }
}

/// Normalize raw scanned input into an [`Envelope`].
///
/// - an object with a `d` field is read as an envelope;
/// - text that parses as such an object is read the same way;
/// - any other non-empty text is a legacy bare payload.
pub fn unwrap(raw: RawCode<'_>) -> Result<Envelope> {
    match raw {
        RawCode::Text(text) => unwrap_text(text),
        RawCode::Json(Value::Null | Value::Bool(false)) => Err(empty_code()),
        RawCode::Json(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(empty_code()),
        RawCode::Json(Value::String(text)) => unwrap_text(text),
        RawCode::Json(Value::Object(object)) => from_object(object)
            .ok_or_else(|| CodecError::envelope("invalid envelope: field 'd' is missing")),
        RawCode::Json(_) => Err(CodecError::envelope("unrecognized code type")),
    }
}

fn unwrap_text(text: &str) -> Result<Envelope> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(empty_code());
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(object)) => {
            if let Some(envelope) = from_object(&object) {
                return Ok(envelope);
            }
        }
        // A quoted payload, as some readers stringify their result.
        Ok(Value::String(inner)) if !inner.trim().is_empty() => {
            tracing::debug!("code is a quoted string, reading it as a legacy payload");
            return Ok(legacy(inner.trim()));
        }
        _ => {}
    }

    tracing::debug!("code is not an envelope, reading it as a legacy payload");
    Ok(legacy(trimmed))
}

fn from_object(object: &Map<String, Value>) -> Option<Envelope> {
    let payload = object
        .get(ENVELOPE_DATA_FIELD)
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())?;

    let tag = match object.get(ENVELOPE_TAG_FIELD) {
        None | Some(Value::Null) => FormatTag::Untagged,
        Some(Value::String(tag)) => FormatTag::from_wire(Some(tag)),
        Some(other) => FormatTag::Other(other.to_string()),
    };
    if !tag.is_known() {
        // Unknown tags are decoded like the current format.
        tracing::warn!(tag = %tag, "unrecognized envelope tag, decoding as {}", WRAPPER_VERSION);
    }

    Some(Envelope {
        tag,
        payload: payload.to_string(),
    })
}

fn legacy(payload: &str) -> Envelope {
    Envelope {
        tag: FormatTag::Legacy,
        payload: payload.to_string(),
    }
}

fn empty_code() -> CodecError {
    CodecError::envelope("empty or unreadable code")
}
