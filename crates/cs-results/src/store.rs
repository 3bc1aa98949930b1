//! Result store capability and the in-memory backend.

use std::collections::HashMap;

use cs_core::{SignalSample, SimError, SimResult};
use cs_scenario::Scenario;

use crate::types::{RunId, RunRecord};
use crate::{parse_run_number, run_id_for};

/// Run-scoped sample storage.
///
/// Reads of an unknown run return nothing; mutations of an unknown run fail
/// with [`SimError::UnknownRun`].
pub trait ResultStore: Send {
    /// Opens a new run for `scenario` and returns its record.
    fn start_run(&mut self, scenario: &Scenario) -> SimResult<RunRecord>;

    fn append_sample(&mut self, record: &RunRecord, sample: SignalSample) -> SimResult<()>;

    /// Marks the run as finished. Samples appended afterwards are still kept.
    fn complete_run(&mut self, record: &RunRecord) -> SimResult<()>;

    /// Samples of `run_id` in append order.
    fn samples(&self, run_id: &str) -> Vec<SignalSample>;

    /// All run ids in the order they were opened.
    fn run_ids(&self) -> Vec<RunId>;

    fn is_complete(&self, run_id: &str) -> bool;
}

#[derive(Debug)]
struct StoredRun {
    record: RunRecord,
    samples: Vec<SignalSample>,
    complete: bool,
}

/// Keeps every run in process memory for the lifetime of the store.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    opened: u64,
    runs: HashMap<RunId, StoredRun>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, run_id: &str) -> Option<&RunRecord> {
        self.runs.get(run_id).map(|run| &run.record)
    }

    fn run_mut(&mut self, run_id: &str) -> SimResult<&mut StoredRun> {
        self.runs.get_mut(run_id).ok_or_else(|| SimError::UnknownRun {
            run_id: run_id.to_string(),
        })
    }
}

impl ResultStore for InMemoryResultStore {
    fn start_run(&mut self, scenario: &Scenario) -> SimResult<RunRecord> {
        self.opened += 1;
        let record = RunRecord::new(run_id_for(self.opened), scenario);
        tracing::debug!(
            run_id = %record.run_id,
            scenario_id = %scenario.id,
            "opened in-memory run"
        );
        self.runs.insert(
            record.run_id.clone(),
            StoredRun {
                record: record.clone(),
                samples: Vec::with_capacity(scenario.step_count),
                complete: false,
            },
        );
        Ok(record)
    }

    fn append_sample(&mut self, record: &RunRecord, sample: SignalSample) -> SimResult<()> {
        self.run_mut(&record.run_id)?.samples.push(sample);
        Ok(())
    }

    fn complete_run(&mut self, record: &RunRecord) -> SimResult<()> {
        self.run_mut(&record.run_id)?.complete = true;
        Ok(())
    }

    fn samples(&self, run_id: &str) -> Vec<SignalSample> {
        self.runs
            .get(run_id)
            .map(|run| run.samples.clone())
            .unwrap_or_default()
    }

    fn run_ids(&self) -> Vec<RunId> {
        let mut ids: Vec<RunId> = self.runs.keys().cloned().collect();
        ids.sort_by_key(|id| parse_run_number(id));
        ids
    }

    fn is_complete(&self, run_id: &str) -> bool {
        self.runs.get(run_id).is_some_and(|run| run.complete)
    }
}
