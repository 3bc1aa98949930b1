//! Result data types.

use cs_scenario::Scenario;
use serde::{Deserialize, Serialize};

use crate::hash::scenario_fingerprint;

pub type RunId = String;

/// Handle for one execution of a scenario. Holds the scenario as it was
/// when the run was opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: RunId,
    pub scenario: Scenario,
    pub fingerprint: String,
    pub started_at: String,
}

impl RunRecord {
    pub fn new(run_id: RunId, scenario: &Scenario) -> Self {
        Self {
            run_id,
            fingerprint: scenario_fingerprint(scenario),
            started_at: chrono::Utc::now().to_rfc3339(),
            scenario: scenario.clone(),
        }
    }
}

/// On-disk summary of a run, written next to its timeseries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub scenario_id: String,
    pub fingerprint: String,
    pub started_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub sample_count: usize,
}

impl RunManifest {
    pub fn opened(record: &RunRecord) -> Self {
        Self {
            run_id: record.run_id.clone(),
            scenario_id: record.scenario.id.clone(),
            fingerprint: record.fingerprint.clone(),
            started_at: record.started_at.clone(),
            completed_at: None,
            sample_count: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}
