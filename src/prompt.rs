//! Natural-language prompts describing one neuron's profile.

use crate::aggregate::ProfileMatrix;
use crate::error::{Error, Result};
use crate::features::{FEATURE_CATALOG, FeatureKind, NUM_FEATURES};
use crate::utils::round_to;

const BOOLEAN_DECIMALS: i32 = 3;

/// Shortest decimal form that always carries a fractional part (`1.0`, `0.667`).
fn format_boolean(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let text = round_to(value, BOOLEAN_DECIMALS).to_string();
    if text.contains('.') { text } else { format!("{text}.0") }
}

/// Truncated toward zero. Non-finite values saturate, NaN prints as 0.
fn format_real(value: f64) -> String {
    (value.trunc() as i64).to_string()
}

pub fn format_feature_value(kind: FeatureKind, value: f64) -> String {
    match kind {
        FeatureKind::Boolean => format_boolean(value),
        FeatureKind::Real => format_real(value),
    }
}

/// Prompt for neuron `neuron_index` (zero-based; printed one-based).
pub fn build_prompt(header: &str, neuron_index: usize, row: &[f64]) -> Result<String> {
    if row.len() != NUM_FEATURES {
        return Err(Error::DimensionMismatch {
            context: "profile row",
            expected: NUM_FEATURES,
            actual: row.len(),
        });
    }

    let mut prompt = format!("{header}\nNeuron {}\n<start>", neuron_index + 1);
    for ((name, kind), &value) in FEATURE_CATALOG.iter().zip(row) {
        prompt.push_str(&format!("{}\t{name}\t{}\n", kind.code(), format_feature_value(*kind, value)));
    }
    prompt.push_str("<end>\nConclusion: ");
    Ok(prompt)
}

/// One prompt per neuron, in neuron order.
pub fn build_prompts(header: &str, profile: &ProfileMatrix) -> Result<Vec<String>> {
    profile
        .rows()
        .iter()
        .enumerate()
        .map(|(j, row)| build_prompt(header, j, row))
        .collect()
}
