//! End-to-end encode/decode behaviour

use fiche_codec::{
    decode, decode_fiche, encode, encode_fiche, transform, DecodeOptions, EncodeOptions,
    FormatTag,
};
use fiche_format::{ConfidenceLevel, Fiche, VariableType};
use fiche_test_utils::{
    choice_fiche, fiche_with_raw_length, incompressible_text, sample_fiche, FicheBuilder,
    LEGACY_COMPACT_JSON,
};
use serde_json::json;

#[test]
fn sample_fiche_round_trips() {
    let doc = sample_fiche();
    let encoded = encode(&doc).expect("encode");
    assert_eq!(decode(&encoded.wrapper_string).expect("decode"), doc);
}

#[test]
fn wrapper_is_much_smaller_than_raw_json() {
    let doc = sample_fiche();
    let encoded = encode(&doc).expect("encode");
    assert!(encoded.stats.compact_json_length < encoded.stats.raw_json_length);
    assert!(encoded.stats.wrapper_total_length < encoded.stats.raw_json_length);
}

#[test]
fn choice_options_keep_length_and_order() {
    let encoded = encode(&choice_fiche()).expect("encode");
    let decoded = decode(&encoded.wrapper_string).expect("decode");
    let variable = &decoded["prompt"]["variables"][0];
    assert_eq!(variable["id"], "couleur");
    assert_eq!(variable["type"], "choice");
    assert_eq!(variable["required"], true);
    assert_eq!(variable["options"], json!(["rouge", "vert"]));
}

#[test]
fn unknown_fields_survive_round_trip() {
    let doc = FicheBuilder::new()
        .extra("foo", json!(1))
        .raw_variable(json!({"id": "x", "label": "X", "type": "text", "placeholder": "ex: 12"}))
        .build();
    let encoded = encode(&doc).expect("encode");
    let decoded = decode(&encoded.wrapper_string).expect("decode");
    assert_eq!(decoded["foo"], 1);
    assert_eq!(decoded["prompt"]["variables"][0]["placeholder"], "ex: 12");
    assert_eq!(decoded, doc);
}

#[test]
fn raw_json_at_cap_encodes() {
    let doc = fiche_with_raw_length(5000);
    let encoded = encode(&doc).expect("5000 characters is within the cap");
    assert_eq!(encoded.stats.raw_json_length, 5000);
    assert_eq!(decode(&encoded.wrapper_string).expect("decode"), doc);
}

#[test]
fn legacy_bare_payload_decodes() {
    let compressed = transform::deflate(LEGACY_COMPACT_JSON.as_bytes(), 9).expect("deflate");
    let bare = transform::to_base64(&compressed);

    let decoded = decode(bare.as_str()).expect("decode legacy");
    assert_eq!(decoded["meta"]["categorie"], "x");
    assert_eq!(decoded["meta"]["titre"], "y");
    assert_eq!(decoded["meta"]["objectif"], "z");
    assert_eq!(decoded["meta"]["date"], "2024-01-01");
    assert_eq!(decoded["prompt"]["base"], "hi");
    assert_eq!(decoded["prompt"]["variables"], json!([]));
}

#[test]
fn parsed_envelope_object_decodes() {
    let encoded = encode(&choice_fiche()).expect("encode");
    let object = encoded.wrapper_object();
    assert_eq!(decode(&object).expect("decode"), choice_fiche());
}

#[test]
fn unknown_tag_decodes_like_current() {
    let encoded = encode(&choice_fiche()).expect("encode");
    let relabeled = json!({"z": "p2", "d": encoded.envelope.payload}).to_string();
    assert_eq!(decode(&relabeled).expect("decode"), choice_fiche());

    let envelope = fiche_codec::unwrap(relabeled.as_str().into()).expect("unwrap");
    assert_eq!(envelope.tag, FormatTag::Other("p2".to_string()));
}

#[test]
fn scanner_whitespace_is_tolerated() {
    let encoded = encode(&choice_fiche()).expect("encode");
    let noisy = format!("\n  {}  \r\n", encoded.wrapper_string);
    assert_eq!(decode(&noisy).expect("decode"), choice_fiche());
}

#[test]
fn typed_fiche_round_trips() {
    let fiche = Fiche::from_value(sample_fiche()).expect("typed");
    let encoded = encode_fiche(&fiche, &EncodeOptions::default()).expect("encode");
    let back = decode_fiche(&encoded.wrapper_string, &DecodeOptions::default()).expect("decode");

    assert_eq!(back, fiche);
    assert_eq!(back.meta.category, "Chimie");
    assert_eq!(back.prompt.variables[2].kind, VariableType::Choice);
    assert_eq!(
        back.ai_levels()["mistral"],
        ConfidenceLevel::NotRecommended
    );
}

#[test]
fn absent_ai_is_defaulted_by_consumer() {
    let encoded = encode(&choice_fiche()).expect("encode");
    let fiche = decode_fiche(&encoded.wrapper_string, &DecodeOptions::default()).expect("decode");
    assert!(fiche.ai.is_none());
    assert_eq!(fiche.ai_levels().len(), 3);
}

#[test]
fn large_fiche_is_flagged_but_not_rejected() {
    let doc = FicheBuilder::new().base(&incompressible_text(4200)).build();

    let encoded = encode(&doc).expect("under the hard cap");
    assert!(encoded.stats.raw_json_length <= 5000);
    assert!(encoded.size.exceeds_advisory);
    assert_eq!(encoded.size.advisory_threshold, 3000);
    assert_eq!(decode(&encoded.wrapper_string).expect("decode"), doc);
}

#[test]
fn highly_repetitive_fiche_round_trips() {
    let doc = FicheBuilder::new()
        .base(&"Décris la situation {{lieu}} et liste les risques. ".repeat(30))
        .variable("lieu", "Lieu", "text", true)
        .build();

    let encoded = encode(&doc).expect("encode");
    assert!(encoded.stats.compressed_byte_length * 4 < encoded.stats.compact_json_length);
    assert_eq!(decode(&encoded.wrapper_string).expect("decode"), doc);
}
