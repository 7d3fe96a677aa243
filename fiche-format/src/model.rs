//! Typed fiche model
//!
//! Field names follow Rust conventions; serde maps them onto the long keys
//! written on the wire (`categorie`, `titre`, ...), which are the keys the
//! compaction table knows about.

use crate::constants::{DEFAULT_ASSISTANTS, DEFAULT_META_VERSION, MIN_CHOICE_OPTIONS};
use crate::error::{FicheError, Result};
use crate::limits::{text_len, Limits};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A fiche: metadata, optional assistant levels and a prompt template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fiche {
    /// Descriptive metadata
    pub meta: Meta,
    /// Confidence level per assistant name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiLevels>,
    /// Template and variables
    pub prompt: Prompt,
}

/// Fiche metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Category (required)
    #[serde(rename = "categorie", default)]
    pub category: String,
    /// Title (required)
    #[serde(rename = "titre", default)]
    pub title: String,
    /// Objective (required)
    #[serde(rename = "objectif", default)]
    pub objective: String,
    /// Author
    #[serde(rename = "concepteur", default)]
    pub author: String,
    /// Author-chosen version string
    #[serde(default = "default_version")]
    pub version: String,
    /// Date, conventionally `YYYY-MM-DD` (required)
    #[serde(default)]
    pub date: String,
}

fn default_version() -> String {
    DEFAULT_META_VERSION.to_string()
}

/// Prompt template and its variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Template text with `{{id}}` placeholders
    #[serde(default)]
    pub base: String,
    /// Variables, in display order
    #[serde(default)]
    pub variables: Vec<Variable>,
}

/// A typed template variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Placeholder name, unique within a fiche
    pub id: String,
    /// Human-readable label
    #[serde(default)]
    pub label: String,
    /// Input kind
    #[serde(rename = "type", default)]
    pub kind: VariableType,
    /// Whether a value must be supplied before rendering
    #[serde(default)]
    pub required: bool,
    /// Allowed values; present only for `choice`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Variable input kind
///
/// Unrecognized kinds read as `Text`, which is how they are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// Numeric input
    Number,
    /// One of a fixed list of options
    Choice,
    /// `"<lat>,<lon>"` position
    Geoloc,
    /// Free text
    #[default]
    #[serde(other)]
    Text,
}

/// How strongly a fiche recommends a given assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ConfidenceLevel {
    /// Not recommended; the assistant is offered disabled
    NotRecommended = 1,
    /// Usable with care
    Usable = 2,
    /// Recommended
    Recommended = 3,
}

impl ConfidenceLevel {
    /// Whether the assistant should be offered at all.
    pub fn is_enabled(self) -> bool {
        self != ConfidenceLevel::NotRecommended
    }
}

impl TryFrom<u8> for ConfidenceLevel {
    type Error = FicheError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(ConfidenceLevel::NotRecommended),
            2 => Ok(ConfidenceLevel::Usable),
            3 => Ok(ConfidenceLevel::Recommended),
            other => Err(FicheError::Invalid(format!(
                "confidence level must be 1, 2 or 3 (got {})",
                other
            ))),
        }
    }
}

impl From<ConfidenceLevel> for u8 {
    fn from(level: ConfidenceLevel) -> u8 {
        level as u8
    }
}

/// Confidence level per assistant name
pub type AiLevels = BTreeMap<String, ConfidenceLevel>;

/// Levels used when a fiche carries no `ai` block.
pub fn default_ai_levels() -> AiLevels {
    DEFAULT_ASSISTANTS
        .iter()
        .map(|name| (name.to_string(), ConfidenceLevel::Recommended))
        .collect()
}

impl Variable {
    /// Create an optional variable with no options.
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: VariableType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            required: false,
            options: None,
        }
    }

    /// Create a `choice` variable.
    pub fn choice<I, S>(id: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut variable = Self::new(id, label, VariableType::Choice);
        variable.options = Some(options.into_iter().map(Into::into).collect());
        variable
    }

    /// Mark the variable as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Label shown to the user, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

impl Fiche {
    /// Convert to the JSON document the pipeline operates on.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Read a fiche from an expanded JSON document.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Assistant levels, with defaults when the fiche has none.
    pub fn ai_levels(&self) -> AiLevels {
        self.ai.clone().unwrap_or_else(default_ai_levels)
    }

    /// Look up a variable by id.
    pub fn variable(&self, id: &str) -> Option<&Variable> {
        self.prompt.variables.iter().find(|v| v.id == id)
    }

    /// Apply the authoring rules a fiche must satisfy before encoding.
    pub fn validate(&self, limits: &Limits) -> Result<()> {
        let meta = &self.meta;
        for (value, name) in [
            (&meta.category, "category"),
            (&meta.title, "title"),
            (&meta.objective, "objective"),
            (&meta.date, "date"),
        ] {
            if value.trim().is_empty() {
                return Err(FicheError::Invalid(format!("{} is required", name)));
            }
        }

        if self.prompt.base.trim().is_empty() {
            return Err(FicheError::Invalid("prompt must not be empty".to_string()));
        }
        let prompt_len = text_len(&self.prompt.base);
        if prompt_len > limits.max_prompt_chars {
            return Err(FicheError::PromptTooLong {
                actual: prompt_len,
                max: limits.max_prompt_chars,
            });
        }

        let variables = &self.prompt.variables;
        if variables.len() > limits.max_variables {
            return Err(FicheError::TooManyVariables {
                actual: variables.len(),
                max: limits.max_variables,
            });
        }

        let mut ids = AHashSet::with_capacity(variables.len());
        for variable in variables {
            if variable.id.trim().is_empty() {
                return Err(FicheError::Invalid("variable id must not be empty".to_string()));
            }
            if variable.label.trim().is_empty() {
                return Err(FicheError::Invalid(format!(
                    "variable '{}' has no label",
                    variable.id
                )));
            }
            if !ids.insert(variable.id.as_str()) {
                return Err(FicheError::DuplicateVariableId {
                    id: variable.id.clone(),
                });
            }
            validate_options(variable)?;
        }

        Ok(())
    }
}

fn validate_options(variable: &Variable) -> Result<()> {
    match (variable.kind, &variable.options) {
        (VariableType::Choice, Some(options)) => {
            let distinct: AHashSet<&str> = options.iter().map(String::as_str).collect();
            if distinct.len() < MIN_CHOICE_OPTIONS {
                return Err(FicheError::Invalid(format!(
                    "variable '{}' needs at least {} distinct choices",
                    variable.display_name(),
                    MIN_CHOICE_OPTIONS
                )));
            }
            Ok(())
        }
        (VariableType::Choice, None) => Err(FicheError::Invalid(format!(
            "variable '{}' needs at least {} distinct choices",
            variable.display_name(),
            MIN_CHOICE_OPTIONS
        ))),
        (_, Some(_)) => Err(FicheError::Invalid(format!(
            "variable '{}' is not a choice and cannot carry options",
            variable.display_name()
        ))),
        (_, None) => Ok(()),
    }
}

/// Split a `;`-separated list of choices, trimming entries and dropping
/// empty ones.
pub fn parse_options(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
