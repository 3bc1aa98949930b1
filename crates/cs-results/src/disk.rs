//! Durable result store: one directory per run with a JSON manifest and a
//! JSON-lines timeseries.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

use cs_core::{SignalSample, SimResult};
use cs_scenario::Scenario;

use crate::store::ResultStore;
use crate::types::{RunId, RunManifest, RunRecord};
use crate::{ResultsError, ResultsResult, parse_run_number, run_id_for};

const MANIFEST_FILE: &str = "manifest.json";
const TIMESERIES_FILE: &str = "timeseries.jsonl";

struct OpenRun {
    manifest: RunManifest,
    writer: LineWriter<File>,
}

/// Stores runs under `root_dir/<run_id>/`. Reopening a root continues the
/// run numbering after the highest existing `run_<n>` directory.
pub struct JsonlResultStore {
    root_dir: PathBuf,
    opened: u64,
    open_runs: HashMap<RunId, OpenRun>,
}

impl JsonlResultStore {
    pub fn open(root_dir: impl Into<PathBuf>) -> ResultsResult<Self> {
        let root_dir = root_dir.into();
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        let opened = list_run_dirs(&root_dir)?
            .iter()
            .filter_map(|id| parse_run_number(id))
            .max()
            .unwrap_or(0);
        tracing::debug!(root = %root_dir.display(), existing_runs = opened, "opened run store");
        Ok(Self {
            root_dir,
            opened,
            open_runs: HashMap::new(),
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join(MANIFEST_FILE).exists()
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        if let Some(run) = self.open_runs.get(run_id) {
            return Ok(run.manifest.clone());
        }
        let manifest_path = self.run_dir(run_id).join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let content = fs::read_to_string(manifest_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_samples(&self, run_id: &str) -> ResultsResult<Vec<SignalSample>> {
        let timeseries_path = self.run_dir(run_id).join(TIMESERIES_FILE);
        if !timeseries_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(timeseries_path)?;
        let mut samples = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                samples.push(serde_json::from_str(line)?);
            }
        }
        Ok(samples)
    }

    /// Manifests of every run on disk, ordered by run number.
    pub fn list_manifests(&self) -> ResultsResult<Vec<RunManifest>> {
        let mut manifests = Vec::new();
        for run_id in self.run_ids() {
            manifests.push(self.load_manifest(&run_id)?);
        }
        Ok(manifests)
    }

    fn write_manifest(&self, manifest: &RunManifest) -> ResultsResult<()> {
        let path = self.run_dir(&manifest.run_id).join(MANIFEST_FILE);
        fs::write(path, serde_json::to_string_pretty(manifest)?)?;
        Ok(())
    }

    fn open_run(&mut self, run_id: &str) -> ResultsResult<&mut OpenRun> {
        if !self.open_runs.contains_key(run_id) {
            // Appending to a run that was completed or written by an earlier
            // store instance.
            let manifest = self.load_manifest(run_id)?;
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(self.run_dir(run_id).join(TIMESERIES_FILE))?;
            self.open_runs.insert(
                run_id.to_string(),
                OpenRun {
                    manifest,
                    writer: LineWriter::new(file),
                },
            );
        }
        self.open_runs
            .get_mut(run_id)
            .ok_or_else(|| ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            })
    }

    fn start(&mut self, scenario: &Scenario) -> ResultsResult<RunRecord> {
        let record = RunRecord::new(run_id_for(self.opened + 1), scenario);
        let run_dir = self.run_dir(&record.run_id);
        fs::create_dir_all(&run_dir)?;

        let manifest = RunManifest::opened(&record);
        self.write_manifest(&manifest)?;
        let file = File::create(run_dir.join(TIMESERIES_FILE))?;
        self.opened += 1;

        self.open_runs.insert(
            record.run_id.clone(),
            OpenRun {
                manifest,
                writer: LineWriter::new(file),
            },
        );
        tracing::debug!(run_id = %record.run_id, dir = %run_dir.display(), "opened run directory");
        Ok(record)
    }

    fn append(&mut self, run_id: &str, sample: &SignalSample) -> ResultsResult<()> {
        let run = self.open_run(run_id)?;
        let mut line = serde_json::to_vec(sample)?;
        line.push(b'\n');
        run.writer.write_all(&line)?;
        run.manifest.sample_count += 1;
        Ok(())
    }

    fn complete(&mut self, run_id: &str) -> ResultsResult<()> {
        self.open_run(run_id)?;
        let Some(mut run) = self.open_runs.remove(run_id) else {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        };
        run.writer.flush()?;
        if run.manifest.is_complete() {
            tracing::warn!(run_id, "run already complete, rewriting manifest");
        }
        run.manifest.completed_at = Some(chrono::Utc::now().to_rfc3339());
        self.write_manifest(&run.manifest)
    }
}

impl ResultStore for JsonlResultStore {
    fn start_run(&mut self, scenario: &Scenario) -> SimResult<RunRecord> {
        Ok(self.start(scenario)?)
    }

    fn append_sample(&mut self, record: &RunRecord, sample: SignalSample) -> SimResult<()> {
        Ok(self.append(&record.run_id, &sample)?)
    }

    fn complete_run(&mut self, record: &RunRecord) -> SimResult<()> {
        Ok(self.complete(&record.run_id)?)
    }

    fn samples(&self, run_id: &str) -> Vec<SignalSample> {
        match self.load_samples(run_id) {
            Ok(samples) => samples,
            Err(ResultsError::RunNotFound { .. }) => Vec::new(),
            Err(err) => {
                tracing::warn!(run_id, error = %err, "failed to read run samples");
                Vec::new()
            }
        }
    }

    fn run_ids(&self) -> Vec<RunId> {
        match list_run_dirs(&self.root_dir) {
            Ok(mut ids) => {
                ids.retain(|id| self.has_run(id));
                ids.sort_by_key(|id| parse_run_number(id));
                ids
            }
            Err(err) => {
                tracing::warn!(
                    root = %self.root_dir.display(),
                    error = %err,
                    "failed to list runs"
                );
                Vec::new()
            }
        }
    }

    fn is_complete(&self, run_id: &str) -> bool {
        self.load_manifest(run_id)
            .is_ok_and(|manifest| manifest.is_complete())
    }
}

fn list_run_dirs(root_dir: &Path) -> ResultsResult<Vec<RunId>> {
    let mut ids = Vec::new();
    for entry in fs::read_dir(root_dir)? {
        let entry = entry?;
        if entry.path().is_dir() {
            let name = entry.file_name().to_string_lossy().to_string();
            if parse_run_number(&name).is_some() {
                ids.push(name);
            }
        }
    }
    Ok(ids)
}
