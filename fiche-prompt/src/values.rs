//! Collecting variable values

use fiche_format::{geoloc, Fiche, FicheError, Result, Variable, VariableType};
use std::collections::BTreeMap;

/// Values keyed by variable id
pub type Values = BTreeMap<String, String>;

/// Suffix of the separate latitude input for a geoloc variable.
pub const LAT_SUFFIX: &str = "_lat";
/// Suffix of the separate longitude input for a geoloc variable.
pub const LON_SUFFIX: &str = "_lon";

/// Build the value of every variable of `fiche` from raw user inputs.
///
/// Inputs are keyed by variable id. A geoloc variable reads either
/// `"<lat>,<lon>"` under its id or separate `<id>_lat` / `<id>_lon` entries.
/// Values are trimmed; variables without input get an empty value.
///
/// Fails on a malformed value, or with the labels of every required
/// variable left empty.
pub fn collect_values(fiche: &Fiche, inputs: &BTreeMap<String, String>) -> Result<Values> {
    let mut values = Values::new();
    let mut missing = Vec::new();

    for variable in &fiche.prompt.variables {
        let value = match variable.kind {
            VariableType::Geoloc => geoloc_value(variable, inputs)?,
            _ => {
                let value = input(inputs, &variable.id).to_string();
                check_value(variable, &value)?;
                value
            }
        };

        if variable.required && value.is_empty() {
            missing.push(variable.display_name().to_string());
        }
        values.insert(variable.id.clone(), value);
    }

    if !missing.is_empty() {
        return Err(FicheError::MissingValues { labels: missing });
    }
    Ok(values)
}

fn input<'a>(inputs: &'a BTreeMap<String, String>, key: &str) -> &'a str {
    inputs.get(key).map(|v| v.trim()).unwrap_or("")
}

fn geoloc_value(variable: &Variable, inputs: &BTreeMap<String, String>) -> Result<String> {
    let joined = input(inputs, &variable.id);
    if !joined.is_empty() {
        return geoloc::normalize_value(joined);
    }

    let lat = input(inputs, &format!("{}{}", variable.id, LAT_SUFFIX));
    let lon = input(inputs, &format!("{}{}", variable.id, LON_SUFFIX));
    if lat.is_empty() || lon.is_empty() {
        return Ok(String::new());
    }
    geoloc::join_value(lat, lon)
}

fn check_value(variable: &Variable, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    match variable.kind {
        VariableType::Number if value.parse::<f64>().map_or(true, |n| !n.is_finite()) => {
            Err(FicheError::Invalid(format!(
                "'{}' expects a number, got '{}'",
                variable.display_name(),
                value
            )))
        }
        VariableType::Choice
            if !variable
                .options
                .as_deref()
                .unwrap_or_default()
                .iter()
                .any(|o| o == value) =>
        {
            Err(FicheError::Invalid(format!(
                "'{}' is not one of the choices for '{}'",
                value,
                variable.display_name()
            )))
        }
        _ => Ok(()),
    }
}
