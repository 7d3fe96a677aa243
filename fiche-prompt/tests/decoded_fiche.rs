use fiche_format::{Fiche, FicheError};
use fiche_prompt::{assistants, build_prompt};
use serde_json::json;
use std::collections::BTreeMap;

fn decoded() -> Fiche {
    Fiche::from_value(json!({
        "meta": {
            "categorie": "Chimie",
            "titre": "Identification produit",
            "objectif": "Identifier une matière dangereuse",
            "date": "2024-01-01"
        },
        "ai": {"chatgpt": 3, "perplexity": 1, "mistral": 2},
        "prompt": {
            "base": "Produit {{code_onu}} ({{etat}}) situé en {{position}}.",
            "variables": [
                {"id": "code_onu", "label": "Code ONU", "type": "number", "required": true},
                {"id": "etat", "label": "État", "type": "choice", "options": ["solide", "liquide"]},
                {"id": "position", "label": "Position", "type": "geoloc"}
            ]
        }
    }))
    .unwrap()
}

fn inputs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn renders_a_complete_prompt() {
    let rendered = build_prompt(
        &decoded(),
        &inputs(&[
            ("code_onu", "1203"),
            ("etat", "liquide"),
            ("position_lat", "45.76"),
            ("position_lon", "4.83"),
        ]),
        Some("Odeur forte"),
    )
    .unwrap();

    assert_eq!(
        rendered.text,
        "Produit 1203 (liquide) situé en 45.76,4.83.\n\nInformations complémentaires :\nOdeur forte"
    );
    assert!(rendered.is_complete());
}

#[test]
fn refuses_missing_required_value() {
    let err = build_prompt(&decoded(), &inputs(&[("etat", "solide")]), None).unwrap_err();
    assert!(matches!(err, FicheError::MissingValues { ref labels } if labels == &["Code ONU"]));
    assert!(err.to_string().contains("Code ONU"));
}

#[test]
fn lists_assistants_from_the_fiche() {
    let list = assistants(&decoded());
    let enabled: Vec<_> = list
        .iter()
        .filter(|a| a.enabled)
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(enabled, ["chatgpt", "mistral"]);
}
