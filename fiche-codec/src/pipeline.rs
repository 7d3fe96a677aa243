//! Encode and decode entry points
//!
//! Encode: validate → size cap → compact keys → JSON → zlib → base64 → wrap.
//! Decode: unwrap → base64 → inflate → UTF-8 → JSON → expand keys.
//!
//! Both directions are pure functions of their input; nothing is retained
//! between calls.

use crate::envelope::{self, Envelope, FormatTag, RawCode};
use crate::error::{CodecError, Result};
use crate::size::{self, SizeReport};
use crate::transform;
use fiche_format::constants::COMPRESSION_LEVEL;
use fiche_format::{keymap, schema, text_len, Fiche, FicheError, Limits};
use serde::Serialize;
use serde_json::Value;

/// Encoder options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Size limits
    pub limits: Limits,
    /// Deflate level (0-9)
    pub compression_level: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            compression_level: COMPRESSION_LEVEL,
        }
    }
}

/// Decoder options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Size limits
    pub limits: Limits,
}

/// Sizes observed while encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodeStats {
    /// Raw JSON length before compaction
    pub raw_json_length: usize,
    /// JSON length after key compaction
    pub compact_json_length: usize,
    /// Deflated byte count
    pub compressed_byte_length: usize,
    /// Base64 payload length
    pub base64_length: usize,
    /// Full wrapped string length
    pub wrapper_total_length: usize,
}

/// Output of [`serialize`]: the base64 payload and the sizes leading to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Base64 of the deflated compact JSON
    pub base64: String,
    /// Raw JSON length before compaction
    pub raw_json_length: usize,
    /// JSON length after key compaction
    pub compact_json_length: usize,
    /// Deflated byte count
    pub compressed_byte_length: usize,
    /// Whether the compacted JSON passed the soft threshold
    pub dense: bool,
}

/// Result of [`encode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// The envelope
    pub envelope: Envelope,
    /// The literal barcode text
    pub wrapper_string: String,
    /// Sizes at each stage
    pub stats: EncodeStats,
    /// Advisory size assessment of `wrapper_string`
    pub size: SizeReport,
}

impl Encoded {
    /// The envelope as a JSON object.
    pub fn wrapper_object(&self) -> Value {
        self.envelope.to_value()
    }
}

/// Turn a document into a base64 payload (no envelope).
pub fn serialize(doc: &Value, opts: &EncodeOptions) -> Result<Payload> {
    schema::validate(doc).map_err(CodecError::Shape)?;
    schema::validate_for_encoding(doc).map_err(CodecError::Shape)?;

    let raw_json_length = text_len(&doc.to_string());
    size::check_raw_length(raw_json_length, &opts.limits)?;

    let json = keymap::compact(doc).to_string();
    let compact_json_length = text_len(&json);
    let dense = size::is_dense(compact_json_length, &opts.limits);

    let compressed = transform::deflate(json.as_bytes(), opts.compression_level)?;
    let base64 = transform::to_base64(&compressed);

    tracing::debug!(
        raw_json_length,
        compact_json_length,
        compressed = compressed.len(),
        base64 = base64.len(),
        "serialized fiche"
    );

    Ok(Payload {
        base64,
        raw_json_length,
        compact_json_length,
        compressed_byte_length: compressed.len(),
        dense,
    })
}

/// Turn a base64 payload back into an expanded document.
pub fn deserialize(payload: &str, opts: &DecodeOptions) -> Result<Value> {
    let compressed = transform::from_base64(payload)?;
    let inflated = transform::inflate(&compressed, opts.limits.max_inflated_bytes)?;
    let json = String::from_utf8_lossy(&inflated);
    tracing::debug!(
        compressed = compressed.len(),
        inflated = inflated.len(),
        "inflated payload"
    );

    let compacted: Value = serde_json::from_str(&json).map_err(CodecError::Parse)?;
    reconstruct(&compacted)
}

fn reconstruct(compacted: &Value) -> Result<Value> {
    if !compacted.is_object() {
        return Err(CodecError::Reconstruction(FicheError::Invalid(
            "decoded payload is not an object".to_string(),
        )));
    }
    let doc = keymap::expand(compacted);
    schema::check_unique_variable_ids(&doc).map_err(CodecError::Reconstruction)?;
    Ok(doc)
}

/// Encode a document with default options.
pub fn encode(doc: &Value) -> Result<Encoded> {
    encode_with(doc, &EncodeOptions::default())
}

/// Encode a document into the barcode text.
pub fn encode_with(doc: &Value, opts: &EncodeOptions) -> Result<Encoded> {
    let payload = serialize(doc, opts)?;
    let envelope = Envelope::wrap(payload.base64);
    let wrapper_string = envelope.to_wire_string();

    let stats = EncodeStats {
        raw_json_length: payload.raw_json_length,
        compact_json_length: payload.compact_json_length,
        compressed_byte_length: payload.compressed_byte_length,
        base64_length: envelope.payload.len(),
        wrapper_total_length: text_len(&wrapper_string),
    };
    let size = SizeReport::from_length(stats.wrapper_total_length, &opts.limits);

    Ok(Encoded {
        envelope,
        wrapper_string,
        stats,
        size,
    })
}

/// Check authoring rules on a typed fiche, then encode it.
///
/// The wire document is the typed model's serialization, defaults included.
pub fn encode_fiche(fiche: &Fiche, opts: &EncodeOptions) -> Result<Encoded> {
    fiche.validate(&opts.limits).map_err(CodecError::Shape)?;
    let doc = fiche.to_value().map_err(CodecError::Shape)?;
    encode_with(&doc, opts)
}

/// Check authoring rules on a typed copy of `doc`, then encode `doc` as is.
///
/// Unknown fields survive and no defaults are added.
pub fn encode_strict(doc: &Value, opts: &EncodeOptions) -> Result<Encoded> {
    schema::validate(doc).map_err(CodecError::Shape)?;
    let fiche = Fiche::from_value(doc.clone()).map_err(CodecError::Shape)?;
    fiche.validate(&opts.limits).map_err(CodecError::Shape)?;
    encode_with(doc, opts)
}

/// Decode scanned input with default options.
pub fn decode<'a>(raw: impl Into<RawCode<'a>>) -> Result<Value> {
    decode_with(raw, &DecodeOptions::default())
}

/// Decode scanned input into the expanded document.
pub fn decode_with<'a>(raw: impl Into<RawCode<'a>>, opts: &DecodeOptions) -> Result<Value> {
    let envelope = envelope::unwrap(raw.into())?;
    tracing::debug!(tag = %envelope.tag, payload = envelope.payload.len(), "unwrapped code");
    deserialize(&envelope.payload, opts)
}

/// Decode scanned input into a typed fiche.
pub fn decode_fiche<'a>(raw: impl Into<RawCode<'a>>, opts: &DecodeOptions) -> Result<Fiche> {
    let doc = decode_with(raw, opts)?;
    Fiche::from_value(doc).map_err(CodecError::Reconstruction)
}

/// What a scanned code contains, without rebuilding the fiche
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    /// Envelope tag, `None` when the envelope had no `z` field
    pub tag: Option<String>,
    /// Whether the tag is one this decoder knows
    pub known_tag: bool,
    /// Whether the code was a bare payload
    pub legacy: bool,
    /// Base64 payload length
    pub payload_length: usize,
    /// Deflated byte count
    pub compressed_byte_length: usize,
    /// Compact JSON length after inflating
    pub compact_json_length: usize,
}

/// Unwrap and inflate a code, reporting its layers.
pub fn inspect<'a>(raw: impl Into<RawCode<'a>>, opts: &DecodeOptions) -> Result<Inspection> {
    let envelope = envelope::unwrap(raw.into())?;
    let compressed = transform::from_base64(&envelope.payload)?;
    let inflated = transform::inflate(&compressed, opts.limits.max_inflated_bytes)?;

    Ok(Inspection {
        tag: envelope.tag.as_str().map(str::to_string),
        known_tag: envelope.tag.is_known(),
        legacy: envelope.tag == FormatTag::Legacy,
        payload_length: envelope.payload.len(),
        compressed_byte_length: compressed.len(),
        compact_json_length: text_len(&String::from_utf8_lossy(&inflated)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fiche() -> Value {
        json!({
            "meta": {"categorie": "x", "titre": "y", "objectif": "z", "date": "2024-01-01"},
            "prompt": {"base": "Bonjour {{nom}}", "variables": [
                {"id": "nom", "label": "Nom", "type": "text", "required": true}
            ]}
        })
    }

    #[test]
    fn serialize_shrinks_and_reports_lengths() {
        let payload = serialize(&fiche(), &EncodeOptions::default()).unwrap();
        assert_eq!(payload.raw_json_length, fiche().to_string().len());
        assert!(payload.compact_json_length < payload.raw_json_length);
        assert!(!payload.dense);
        assert_eq!(
            deserialize(&payload.base64, &DecodeOptions::default()).unwrap(),
            fiche()
        );
    }

    #[test]
    fn encode_reports_consistent_stats() {
        let encoded = encode(&fiche()).unwrap();
        assert_eq!(encoded.stats.base64_length, encoded.envelope.payload.len());
        assert_eq!(
            encoded.stats.wrapper_total_length,
            encoded.wrapper_string.len()
        );
        assert_eq!(encoded.size.wrapper_length, encoded.wrapper_string.len());
        assert!(!encoded.size.exceeds_advisory);
        assert_eq!(encoded.wrapper_object()["z"], "p1");
        assert!(encoded.wrapper_string.starts_with(r#"{"z":"p1","d":""#));
    }

    #[test]
    fn shape_is_checked_before_anything_else() {
        let err = encode(&json!({"prompt": {"base": "x", "variables": []}})).unwrap_err();
        assert_eq!(err.stage(), "validation");
    }

    #[test]
    fn strict_encoding_keeps_the_document_verbatim() {
        let mut doc = fiche();
        doc["foo"] = json!(1);
        doc["prompt"]["variables"][0]["placeholder"] = json!("ex");

        let encoded = encode_strict(&doc, &EncodeOptions::default()).unwrap();
        assert_eq!(encoded.stats.raw_json_length, doc.to_string().len());
        assert_eq!(decode(&encoded.wrapper_string).unwrap(), doc);
    }

    #[test]
    fn strict_encoding_applies_authoring_rules() {
        let mut doc = fiche();
        doc["prompt"]["variables"][0]["label"] = json!("");
        assert!(encode(&doc).is_ok());
        let err = encode_strict(&doc, &EncodeOptions::default()).unwrap_err();
        assert_eq!(err.stage(), "validation");
    }

    #[test]
    fn non_object_payload_is_a_reconstruction_error() {
        let compressed = transform::deflate(b"[1,2,3]", 9).unwrap();
        let err = deserialize(&transform::to_base64(&compressed), &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err.stage(), "reconstruction");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let mut bytes = br#"{"m":{"c":""#.to_vec();
        bytes.push(0xff);
        bytes.extend_from_slice(br#""},"p":{"b":"x","V":[]}}"#);
        let compressed = transform::deflate(&bytes, 9).unwrap();
        let doc = deserialize(&transform::to_base64(&compressed), &DecodeOptions::default())
            .unwrap();
        assert_eq!(doc["meta"]["categorie"], "\u{fffd}");
    }

    #[test]
    fn inspect_reports_layers() {
        let encoded = encode(&fiche()).unwrap();
        let report = inspect(&encoded.wrapper_string, &DecodeOptions::default()).unwrap();
        assert_eq!(report.tag.as_deref(), Some("p1"));
        assert!(report.known_tag);
        assert!(!report.legacy);
        assert_eq!(report.payload_length, encoded.stats.base64_length);
        assert_eq!(report.compressed_byte_length, encoded.stats.compressed_byte_length);
        assert_eq!(report.compact_json_length, encoded.stats.compact_json_length);
    }
}
