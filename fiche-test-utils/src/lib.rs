//! Fiche Test Utilities
//!
//! Shared fixtures for the fiche crates' tests and benches.

use serde_json::{json, Map, Value};

/// Builder for fiche documents using the long (expanded) keys
pub struct FicheBuilder {
    meta: Map<String, Value>,
    ai: Option<Map<String, Value>>,
    base: String,
    variables: Vec<Value>,
    extra: Map<String, Value>,
}

impl FicheBuilder {
    /// A builder with the four required meta fields filled in
    pub fn new() -> Self {
        let mut meta = Map::new();
        meta.insert("categorie".to_string(), json!("Chimie"));
        meta.insert("titre".to_string(), json!("Identification produit"));
        meta.insert("objectif".to_string(), json!("Identifier une matière dangereuse"));
        meta.insert("date".to_string(), json!("2024-01-01"));
        Self {
            meta,
            ai: None,
            base: "Analyse le produit {{code_onu}}.".to_string(),
            variables: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Set a meta field
    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.meta.insert(key.to_string(), json!(value));
        self
    }

    /// Set the assistant level for `name`
    pub fn ai(mut self, name: &str, level: u8) -> Self {
        self.ai
            .get_or_insert_with(Map::new)
            .insert(name.to_string(), json!(level));
        self
    }

    /// Set the prompt template
    pub fn base(mut self, base: &str) -> Self {
        self.base = base.to_string();
        self
    }

    /// Add a `text` or `number` variable
    pub fn variable(mut self, id: &str, label: &str, kind: &str, required: bool) -> Self {
        self.variables.push(json!({
            "id": id,
            "label": label,
            "type": kind,
            "required": required,
        }));
        self
    }

    /// Add a `choice` variable
    pub fn choice(mut self, id: &str, label: &str, options: &[&str], required: bool) -> Self {
        self.variables.push(json!({
            "id": id,
            "label": label,
            "type": "choice",
            "required": required,
            "options": options,
        }));
        self
    }

    /// Add a raw variable object
    pub fn raw_variable(mut self, variable: Value) -> Self {
        self.variables.push(variable);
        self
    }

    /// Add a top-level field unknown to the key table
    pub fn extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    /// Build the document
    pub fn build(self) -> Value {
        let mut root = Map::new();
        root.insert("meta".to_string(), Value::Object(self.meta));
        if let Some(ai) = self.ai {
            root.insert("ai".to_string(), Value::Object(ai));
        }
        root.insert(
            "prompt".to_string(),
            json!({"base": self.base, "variables": self.variables}),
        );
        root.extend(self.extra);
        Value::Object(root)
    }
}

impl Default for FicheBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A fiche exercising every variable type and the `ai` block
pub fn sample_fiche() -> Value {
    FicheBuilder::new()
        .meta("concepteur", "Cellule RCH")
        .meta("version", "1.2")
        .ai("chatgpt", 3)
        .ai("perplexity", 2)
        .ai("mistral", 1)
        .base(
            "Produit ONU {{code_onu}}, quantité {{quantite}} kg, \
             état {{etat}}, position {{position}}. Donne les risques.",
        )
        .variable("code_onu", "Code ONU", "number", true)
        .variable("quantite", "Quantité", "number", false)
        .choice("etat", "État", &["solide", "liquide", "gazeux"], true)
        .variable("position", "Position", "geoloc", false)
        .build()
}

/// A fiche with a single required `choice` variable
pub fn choice_fiche() -> Value {
    FicheBuilder::new()
        .base("Couleur : {{couleur}}")
        .choice("couleur", "Couleur", &["rouge", "vert"], true)
        .build()
}

/// A fiche whose compact JSON serialization is exactly `target` characters
///
/// Pads `meta.objectif` with ASCII. Panics if `target` is below the size of
/// the unpadded document.
pub fn fiche_with_raw_length(target: usize) -> Value {
    let mut doc = FicheBuilder::new().meta("objectif", "").build();
    let base_len = doc.to_string().len();
    assert!(
        target >= base_len,
        "target {} is below the minimal fiche size {}",
        target,
        base_len
    );
    doc["meta"]["objectif"] = json!("a".repeat(target - base_len));
    doc
}

/// Alphanumeric text that deflate cannot shrink much
///
/// Deterministic, so encoded sizes are stable across runs.
pub fn incompressible_text(len: usize) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut state: u32 = 0x9E37_79B9;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            char::from(ALPHABET[(state % ALPHABET.len() as u32) as usize])
        })
        .collect()
}

/// Compact-key JSON of a minimal fiche, as written by early encoders
pub const LEGACY_COMPACT_JSON: &str =
    r#"{"m":{"c":"x","T":"y","o":"z","d":"2024-01-01"},"p":{"b":"hi","V":[]}}"#;
