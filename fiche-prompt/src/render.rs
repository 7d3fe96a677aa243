//! Filling the prompt template

use crate::values::Values;
use fiche_format::Fiche;
use serde::Serialize;

/// Heading of the free-text section appended after the prompt.
pub const EXTRA_INFO_HEADING: &str = "Informations complémentaires :";

/// A prompt ready to hand to an assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPrompt {
    /// Final prompt text
    pub text: String,
    /// Placeholders left in the text, in order of appearance
    pub unreplaced: Vec<String>,
}

impl RenderedPrompt {
    /// True when every placeholder was filled.
    pub fn is_complete(&self) -> bool {
        self.unreplaced.is_empty()
    }
}

/// Replace each `{{id}}` of the base prompt with the value of that variable.
///
/// Variables without a value render as empty text. Placeholders that name
/// no variable stay in the text and are reported. Substitution is a single
/// pass, so values are never themselves expanded.
pub fn render(fiche: &Fiche, values: &Values, extra: Option<&str>) -> RenderedPrompt {
    let base = &fiche.prompt.base;
    let mut text = String::with_capacity(base.len());
    let mut unreplaced = Vec::new();
    let mut rest = base.as_str();

    while let Some(start) = rest.find("{{") {
        text.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        // A name runs up to the next brace. Otherwise only the first `{` is
        // literal, so `{{{a}}}` still finds `{{a}}`.
        match after.find(['{', '}']) {
            Some(end) if end > 0 && after[end..].starts_with("}}") => {
                let name = &after[..end];
                if fiche.variable(name).is_some() {
                    text.push_str(values.get(name).map(String::as_str).unwrap_or(""));
                } else {
                    let placeholder = &rest[start..start + end + 4];
                    text.push_str(placeholder);
                    unreplaced.push(placeholder.to_string());
                }
                rest = &after[end + 2..];
            }
            _ => {
                text.push('{');
                rest = &rest[start + 1..];
            }
        }
    }
    text.push_str(rest);

    if !unreplaced.is_empty() {
        tracing::warn!(
            placeholders = ?unreplaced,
            "prompt still contains unreplaced placeholders"
        );
    }

    if let Some(extra) = extra.map(str::trim).filter(|e| !e.is_empty()) {
        text.push_str("\n\n");
        text.push_str(EXTRA_INFO_HEADING);
        text.push('\n');
        text.push_str(extra);
    }

    RenderedPrompt { text, unreplaced }
}
