//! Combination fingerprinting — deterministic identity for grid rows.
//!
//! BLAKE3 over canonical JSON of the full settings. Two rows with the
//! same settings always hash identically, across runs and platforms, so
//! summary rows can be deduplicated and joined against earlier sweeps.

use serde_json::json;

use leverlab_core::settings::{DynamicOrderSettings, ExchangeSettings, StaticOrderSettings};

/// Hex fingerprint of one (static, dynamic, exchange) combination.
pub fn combination_fingerprint(
    statics: &StaticOrderSettings,
    dos: &DynamicOrderSettings,
    exchange: &ExchangeSettings,
) -> String {
    // Canonical serialization: struct fields stream in declaration order,
    // top-level keys are fixed here.
    let canonical = json!({
        "static": statics,
        "dynamic": dos,
        "exchange": exchange,
    });
    blake3::hash(canonical.to_string().as_bytes())
        .to_hex()
        .to_string()
}
