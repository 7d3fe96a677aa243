//! Key compaction table
//!
//! Long document keys are shortened to one-character codes before
//! compression. Keys missing from the table pass through untouched in both
//! directions, so a fiche written with newer fields still decodes (those
//! fields simply do not shrink).

use crate::error::{FicheError, Result};
use ahash::AHashMap;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Built-in long key → short code pairs.
///
/// Must cover every key the encoder writes. Short codes must be unique.
pub const KEY_TABLE: &[(&str, &str)] = &[
    // meta
    ("meta", "m"),
    ("categorie", "c"),
    ("titre", "T"),
    ("objectif", "o"),
    ("concepteur", "C"),
    ("date", "d"),
    ("version", "v"),
    // prompt
    ("prompt", "p"),
    ("base", "b"),
    ("variables", "V"),
    // variables
    ("id", "i"),
    ("label", "l"),
    ("type", "t"),
    ("required", "r"),
    ("options", "O"),
    // assistant confidence levels
    ("ai", "A"),
];

static BUILTIN: LazyLock<KeyTable> = LazyLock::new(|| {
    KeyTable::from_pairs(KEY_TABLE).expect("built-in key table must map each short code once")
});

/// Bidirectional long key ↔ short code mapping
#[derive(Debug, Clone)]
pub struct KeyTable {
    forward: AHashMap<&'static str, &'static str>,
    reverse: AHashMap<&'static str, &'static str>,
}

impl KeyTable {
    /// Build a table, deriving the reverse map by inverting `pairs`.
    ///
    /// Fails if two long keys share a short code, since expansion could not
    /// tell them apart.
    pub fn from_pairs(pairs: &[(&'static str, &'static str)]) -> Result<Self> {
        let mut forward = AHashMap::with_capacity(pairs.len());
        let mut reverse = AHashMap::with_capacity(pairs.len());

        for &(long, short) in pairs {
            if let Some(first) = reverse.insert(short, long) {
                return Err(FicheError::DuplicateShortCode {
                    code: short.to_string(),
                    first: first.to_string(),
                    second: long.to_string(),
                });
            }
            if forward.insert(long, short).is_some() {
                return Err(FicheError::Invalid(format!(
                    "key table lists '{}' twice",
                    long
                )));
            }
        }

        Ok(Self { forward, reverse })
    }

    /// The process-wide table used by the encoder and decoder.
    pub fn builtin() -> &'static KeyTable {
        &BUILTIN
    }

    /// Short code for a long key, if the key is in the table.
    pub fn short_code(&self, key: &str) -> Option<&'static str> {
        self.forward.get(key).copied()
    }

    /// Long key for a short code, if the code is in the table.
    pub fn long_key(&self, code: &str) -> Option<&'static str> {
        self.reverse.get(code).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Replace every known long key with its short code, recursively.
    pub fn compact(&self, value: &Value) -> Value {
        rename_keys(value, &self.forward)
    }

    /// Replace every known short code with its long key, recursively.
    pub fn expand(&self, value: &Value) -> Value {
        rename_keys(value, &self.reverse)
    }
}

fn rename_keys(value: &Value, names: &AHashMap<&'static str, &'static str>) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| rename_keys(v, names)).collect()),
        Value::Object(fields) => {
            let mut out = Map::with_capacity(fields.len());
            for (key, child) in fields {
                let renamed = match names.get(key.as_str()) {
                    Some(name) => (*name).to_string(),
                    None => key.clone(),
                };
                // Colliding output keys: the later entry wins.
                if out.contains_key(&renamed) {
                    tracing::warn!(key = %key, renamed = %renamed, "key collides after renaming");
                }
                out.insert(renamed, rename_keys(child, names));
            }
            Value::Object(out)
        }
        scalar => scalar.clone(),
    }
}

/// Compact `value` with the built-in table.
pub fn compact(value: &Value) -> Value {
    KeyTable::builtin().compact(value)
}

/// Expand `value` with the built-in table.
pub fn expand(value: &Value) -> Value {
    KeyTable::builtin().expand(value)
}
