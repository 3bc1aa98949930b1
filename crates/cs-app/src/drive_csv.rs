//! Drive-cycle CSV ingestion.
//!
//! The file has a header row naming at least three columns. `time_s` and
//! `speed_kph` are required; `distance_m`, `grade_percent` and `phase` are
//! optional. Fields may be quoted and are trimmed. Blank lines are skipped.

use std::fs;
use std::path::Path;

use cs_core::{SignalSample, SimError, SimResult};
use cs_models::drive::phase_code;
use cs_scenario::{DriveCycle, DriveCycleSample};

use crate::registry::{DataImporter, ImportedDataset, has_extension};

pub const DRIVE_CYCLE_ID: &str = "WLTP_Class3";

const TIME: &str = "time_s";
const SPEED: &str = "speed_kph";
const DISTANCE: &str = "distance_m";
const GRADE: &str = "grade_percent";
const PHASE: &str = "phase";

pub fn load_drive_cycle_csv(path: &Path) -> SimResult<DriveCycle> {
    let content = fs::read_to_string(path).map_err(|err| {
        SimError::backend(format!(
            "unable to read drive cycle {}: {err}",
            path.display()
        ))
    })?;
    let cycle = parse_drive_cycle_csv(&content, &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        samples = cycle.samples.len(),
        sample_interval = cycle.sample_interval,
        "loaded drive cycle"
    );
    Ok(cycle)
}

struct Columns {
    width: usize,
    time: usize,
    speed: usize,
    distance: Option<usize>,
    grade: Option<usize>,
    phase: Option<usize>,
}

impl Columns {
    fn from_header(headers: &csv::StringRecord) -> SimResult<Self> {
        if headers.len() < 3 {
            return Err(SimError::format(
                "drive cycle header must contain at least three columns",
            ));
        }
        let find = |name: &str| headers.iter().position(|h| h == name);
        let (Some(time), Some(speed)) = (find(TIME), find(SPEED)) else {
            return Err(SimError::format(format!(
                "drive cycle header must contain {TIME} and {SPEED} columns"
            )));
        };
        Ok(Self {
            width: headers.len(),
            time,
            speed,
            distance: find(DISTANCE),
            grade: find(GRADE),
            phase: find(PHASE),
        })
    }
}

/// Parses drive-cycle CSV text. `source` is recorded on the cycle and used
/// in error messages.
pub fn parse_drive_cycle_csv(content: &str, source: &str) -> SimResult<DriveCycle> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SimError::format(format!("{source}: {e}")))?
        .clone();
    if headers.iter().all(str::is_empty) {
        return Err(SimError::format(format!("drive cycle CSV is empty: {source}")));
    }
    let columns = Columns::from_header(&headers)?;

    let mut cycle = DriveCycle {
        id: DRIVE_CYCLE_ID.to_string(),
        description: "WLTP Class 3 representative cycle".to_string(),
        source: source.to_string(),
        sample_interval: 0.0,
        samples: Vec::new(),
    };

    for result in reader.records() {
        let record = result.map_err(|e| SimError::format(format!("{source}: {e}")))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line_no = record.position().map_or(0, |p| p.line());
        if record.len() < columns.width {
            tracing::warn!(
                line = line_no,
                found = record.len(),
                expected = columns.width,
                "short drive cycle row, missing fields left empty"
            );
        }
        let field = |column: usize| record.get(column).unwrap_or("");
        let number = |column: usize, name: &str| parse_number(field(column), line_no, name);
        let optional = |column: Option<usize>, name: &str| match column {
            Some(column) if !field(column).is_empty() => number(column, name),
            _ => Ok(0.0),
        };

        let sample = DriveCycleSample {
            timestamp: number(columns.time, TIME)?,
            speed_kph: number(columns.speed, SPEED)?,
            distance_m: optional(columns.distance, DISTANCE)?,
            grade_percent: optional(columns.grade, GRADE)?,
            phase: columns
                .phase
                .map(|column| field(column).to_string())
                .unwrap_or_default(),
        };

        if let Some(previous) = cycle.samples.last() {
            if sample.timestamp < previous.timestamp {
                return Err(SimError::format(format!(
                    "line {line_no}: timestamp {} goes back from {}",
                    sample.timestamp, previous.timestamp
                )));
            }
            cycle.sample_interval = sample.timestamp - previous.timestamp;
        }
        cycle.samples.push(sample);
    }

    if cycle.samples.is_empty() {
        return Err(SimError::format(format!(
            "drive cycle CSV did not contain samples: {source}"
        )));
    }
    if cycle.sample_interval <= 0.0 {
        cycle.sample_interval = 1.0;
    }
    Ok(cycle)
}

fn parse_number(value: &str, line_no: u64, column: &str) -> SimResult<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SimError::format(format!(
            "line {line_no}, column {column}: cannot parse '{value}' as a number"
        ))),
    }
}

/// Converts a drive cycle into `drive.*` samples.
pub fn drive_cycle_samples(cycle: &DriveCycle) -> Vec<SignalSample> {
    cycle
        .samples
        .iter()
        .map(|s| {
            let mut sample = SignalSample::new(s.timestamp);
            sample.insert("drive.speed_kph", s.speed_kph);
            sample.insert("drive.distance_m", s.distance_m);
            sample.insert("drive.grade_percent", s.grade_percent);
            sample.insert("drive.phase_id", phase_code(&s.phase));
            sample
        })
        .collect()
}

/// Imports `.csv` drive cycles as `drive.*` signal samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriveCycleCsvImporter;

impl DataImporter for DriveCycleCsvImporter {
    fn format(&self) -> &str {
        "csv"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, "csv")
    }

    fn import_from(&self, path: &Path) -> SimResult<ImportedDataset> {
        let cycle = load_drive_cycle_csv(path)?;
        Ok(ImportedDataset {
            name: cycle.id.clone(),
            samples: drive_cycle_samples(&cycle),
        })
    }
}
