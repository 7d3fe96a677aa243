//! Fiche Prompt - turning a decoded fiche into a prompt
//!
//! Once a fiche is decoded, the user fills its variables and picks an
//! assistant. This crate covers that side:
//!
//! - Collecting and checking variable values
//! - Rendering the base prompt with those values
//! - Listing the assistants the fiche recommends

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod assistants;
pub mod render;
pub mod values;

pub use assistants::{assistants, Assistant};
pub use render::{render, RenderedPrompt, EXTRA_INFO_HEADING};
pub use values::{collect_values, Values};

use fiche_format::{Fiche, Result};
use std::collections::BTreeMap;

/// Collect the values from raw inputs and render the prompt in one step.
pub fn build_prompt(
    fiche: &Fiche,
    inputs: &BTreeMap<String, String>,
    extra: Option<&str>,
) -> Result<RenderedPrompt> {
    let values = collect_values(fiche, inputs)?;
    tracing::debug!(variables = values.len(), "collected variable values");
    Ok(render(fiche, &values, extra))
}
