//! Terminal rendering for predictions, model listings, and encoder options.

use salarium_core::{CategoricalField, EncodedRecord, EncoderBundle, PredictionResult};
use salarium_store::ArtifactStore;

const CURRENCY: &str = "₹";

// ── Public API ──

/// Print a prediction with its provenance.
pub fn print_result(result: &PredictionResult) {
    println!("Estimated salary: {}", format_salary(result.value));
    println!("Predicted using {}", result.model_used);
}

/// Print the encoded row the model saw, one feature per line.
pub fn print_encoded(record: &EncodedRecord) {
    println!();
    println!("Encoded input");
    for (name, value) in record.named() {
        println!("  {:<26} {}", name, value);
    }
}

/// Print every selectable model with its artifact path and whether it is on disk.
pub fn print_models(store: &ArtifactStore) {
    for (kind, path) in store.registry().entries() {
        let status = if store.model_available(kind) {
            "available"
        } else {
            "missing"
        };
        println!("  {:<20} {:<10} {}", kind.display_name(), status, path.display());
    }
}

/// Print the vocabulary for each field in `fields`.
pub fn print_options(bundle: &EncoderBundle, fields: &[CategoricalField]) {
    for &field in fields {
        let options = bundle.options(field);
        println!("{} ({}):", field, options.len());
        for option in options {
            println!("  {option}");
        }
        println!();
    }
}

// ── Helpers ──

/// Format a salary as `₹ 1,234,567.89`.
pub fn format_salary(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{CURRENCY} {sign}{}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
