//! Content-based scenario fingerprints.

use cs_scenario::Scenario;
use sha2::{Digest, Sha256};

/// SHA-256 over the scenario's JSON form, hex encoded. Two runs with the
/// same fingerprint were driven by identical inputs.
pub fn scenario_fingerprint(scenario: &Scenario) -> String {
    let mut hasher = Sha256::new();
    let scenario_json = serde_json::to_string(scenario).unwrap_or_default();
    hasher.update(scenario_json.as_bytes());
    format!("{:x}", hasher.finalize())
}
