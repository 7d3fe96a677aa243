//! Which assistants a fiche recommends

use fiche_format::{constants::DEFAULT_ASSISTANTS, ConfidenceLevel, Fiche};
use serde::Serialize;

/// An assistant the prompt can be sent to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assistant {
    /// Assistant name as written in the fiche
    pub name: String,
    /// Confidence the author puts in it
    pub level: ConfidenceLevel,
    /// False when the fiche advises against it
    pub enabled: bool,
}

/// List the assistants of a fiche.
///
/// The well-known assistants come first in their usual order, followed by
/// any other name the fiche mentions, alphabetically. A fiche without an
/// `ai` block recommends every well-known assistant.
pub fn assistants(fiche: &Fiche) -> Vec<Assistant> {
    let mut levels = fiche.ai_levels();
    let mut out = Vec::with_capacity(levels.len());

    for name in DEFAULT_ASSISTANTS {
        if let Some(level) = levels.remove(name) {
            out.push(Assistant::new(name.to_string(), level));
        }
    }
    out.extend(
        levels
            .into_iter()
            .map(|(name, level)| Assistant::new(name, level)),
    );
    out
}

impl Assistant {
    fn new(name: String, level: ConfidenceLevel) -> Self {
        Self {
            name,
            enabled: level.is_enabled(),
            level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiche_format::{AiLevels, Meta, Prompt};

    fn fiche(ai: Option<AiLevels>) -> Fiche {
        Fiche {
            meta: Meta {
                category: "c".to_string(),
                title: "t".to_string(),
                objective: "o".to_string(),
                author: String::new(),
                version: "1.0".to_string(),
                date: String::new(),
            },
            ai,
            prompt: Prompt {
                base: "b".to_string(),
                variables: Vec::new(),
            },
        }
    }

    #[test]
    fn defaults_recommend_everything() {
        let list = assistants(&fiche(None));
        let names: Vec<_> = list.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["chatgpt", "perplexity", "mistral"]);
        assert!(list
            .iter()
            .all(|a| a.enabled && a.level == ConfidenceLevel::Recommended));
    }

    #[test]
    fn level_one_disables() {
        let ai: AiLevels = [
            ("mistral".to_string(), ConfidenceLevel::NotRecommended),
            ("claude".to_string(), ConfidenceLevel::Usable),
            ("chatgpt".to_string(), ConfidenceLevel::Recommended),
        ]
        .into_iter()
        .collect();

        let list = assistants(&fiche(Some(ai)));
        let names: Vec<_> = list.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["chatgpt", "mistral", "claude"]);
        assert!(list[0].enabled);
        assert!(!list[1].enabled);
        assert!(list[2].enabled);
    }
}
