//! Tab-separated export of signal samples.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use cs_core::{SignalSample, SimError, SimResult};
use cs_scenario::{CellDefinition, Scenario};

use crate::registry::DataExporter;

/// Provenance written as comment lines above the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportHeader {
    pub drive_cycle_source: String,
    pub ambient_temperature_c: f64,
    pub cells: Vec<CellDefinition>,
}

impl ExportHeader {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            drive_cycle_source: scenario.drive_cycle.source.clone(),
            ambient_temperature_c: scenario.environment.ambient_temperature_c,
            cells: scenario.cells.clone(),
        }
    }
}

/// Column order for export: `drive.*` signals first, then the rest, each
/// group sorted by name.
pub fn order_columns<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut ordered: Vec<String> = names
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    ordered.sort_by(|a, b| {
        let a_drive = a.starts_with("drive.");
        let b_drive = b.starts_with("drive.");
        b_drive.cmp(&a_drive).then_with(|| a.cmp(b))
    });
    ordered
}

/// Combines runs that share a time grid into one row per timestamp. For a
/// signal present in several runs at the same time, the later run wins.
pub fn merge_runs(runs: &[Vec<SignalSample>]) -> Vec<SignalSample> {
    let mut merged: Vec<SignalSample> = Vec::new();
    for sample in runs.iter().flatten() {
        match merged.binary_search_by(|row| row.timestamp.total_cmp(&sample.timestamp)) {
            Ok(pos) => {
                for (name, value) in &sample.signals {
                    merged[pos].insert(name.clone(), *value);
                }
            }
            Err(pos) => merged.insert(pos, sample.clone()),
        }
    }
    merged
}

/// Writes `samples` as a tab-separated table with a `time_s` column.
/// Signals a row lacks are written as `nan`.
pub fn write_tabular<W: Write>(
    out: &mut W,
    header: Option<&ExportHeader>,
    samples: &[SignalSample],
) -> io::Result<()> {
    if let Some(header) = header {
        writeln!(out, "# Cell simulation export")?;
        writeln!(out, "# Drive cycle source: {}", header.drive_cycle_source)?;
        writeln!(
            out,
            "# Ambient temperature [C]: {}",
            header.ambient_temperature_c
        )?;
        writeln!(out, "# Cells:")?;
        for cell in &header.cells {
            writeln!(
                out,
                "#   - {} ({}, model: {}, capacity: {} Ah)",
                cell.cell_id, cell.chemistry, cell.model_kind, cell.capacity_ah
            )?;
        }
    }

    let columns = order_columns(
        samples
            .iter()
            .flat_map(|s| s.signals.keys().map(String::as_str)),
    );

    write!(out, "time_s")?;
    for name in &columns {
        write!(out, "\t{name}")?;
    }
    writeln!(out)?;

    for sample in samples {
        write!(out, "{}", format_value(sample.timestamp))?;
        for name in &columns {
            let value = sample.get(name).unwrap_or(f64::NAN);
            write!(out, "\t{}", format_value(value))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        value.to_string()
    }
}

/// Exports samples as `.tsv`, optionally preceded by a provenance header.
#[derive(Debug, Clone, Default)]
pub struct TsvExporter {
    header: Option<ExportHeader>,
}

impl TsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(header: ExportHeader) -> Self {
        Self {
            header: Some(header),
        }
    }
}

impl DataExporter for TsvExporter {
    fn format(&self) -> &str {
        "tsv"
    }

    fn export_to(&self, path: &Path, samples: &[SignalSample]) -> SimResult<()> {
        let write = || -> io::Result<()> {
            let mut out = BufWriter::new(File::create(path)?);
            write_tabular(&mut out, self.header.as_ref(), samples)?;
            out.flush()
        };
        write().map_err(|err| {
            SimError::backend(format!("unable to write {}: {err}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), rows = samples.len(), "exported samples");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_scenario::cell_preset;

    fn sample(t: f64, signals: &[(&str, f64)]) -> SignalSample {
        let mut s = SignalSample::new(t);
        for (name, value) in signals {
            s.insert(*name, *value);
        }
        s
    }

    #[test]
    fn drive_columns_come_first() {
        let ordered =
            order_columns(["b.soc", "drive.speed_kph", "a.voltage_v", "drive.accel_mps2"]);
        assert_eq!(
            ordered,
            vec!["drive.accel_mps2", "drive.speed_kph", "a.voltage_v", "b.soc"]
        );
    }

    #[test]
    fn merge_aligns_rows_by_time() {
        let a = vec![sample(0.0, &[("a.v", 1.0)]), sample(1.0, &[("a.v", 2.0)])];
        let b = vec![sample(1.0, &[("b.v", 3.0)]), sample(0.0, &[("b.v", 4.0)])];
        let merged = merge_runs(&[a, b]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].get("b.v"), Some(4.0));
        assert_eq!(merged[1].get("a.v"), Some(2.0));
        assert_eq!(merged[1].get("b.v"), Some(3.0));
    }

    #[test]
    fn table_layout_with_header() {
        let header = ExportHeader {
            drive_cycle_source: "data/wltp.csv".into(),
            ambient_temperature_c: 25.0,
            cells: vec![cell_preset("NMC811").unwrap()],
        };
        let samples = vec![
            sample(0.0, &[("NMC811.soc", 1.0), ("drive.speed_kph", 0.0)]),
            sample(1.5, &[("drive.speed_kph", 12.5)]),
        ];
        let mut out = Vec::new();
        write_tabular(&mut out, Some(&header), &samples).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# Cell simulation export");
        assert_eq!(lines[1], "# Drive cycle source: data/wltp.csv");
        assert_eq!(lines[2], "# Ambient temperature [C]: 25");
        assert_eq!(lines[3], "# Cells:");
        assert_eq!(lines[4], "#   - NMC811 (NMC811, model: ohmic, capacity: 5 Ah)");
        assert_eq!(lines[5], "time_s\tdrive.speed_kph\tNMC811.soc");
        assert_eq!(lines[6], "0\t0\t1");
        assert_eq!(lines[7], "1.5\t12.5\tnan");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn headerless_table_starts_with_columns() {
        let mut out = Vec::new();
        write_tabular(&mut out, None, &[sample(0.0, &[("x", 1.0)])]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "time_s\tx\n0\t1\n");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn drive_columns_lead_and_groups_are_sorted(
            names in prop::collection::vec("(drive\\.)?[a-z]{1,6}\\.[a-z_]{1,8}", 0..30),
        ) {
            let ordered = order_columns(names.iter().map(String::as_str));
            let split = ordered.iter().take_while(|n| n.starts_with("drive.")).count();
            prop_assert!(ordered[split..].iter().all(|n| !n.starts_with("drive.")));
            prop_assert!(ordered[..split].windows(2).all(|w| w[0] < w[1]));
            prop_assert!(ordered[split..].windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn merged_rows_are_unique_and_ordered(
            times in prop::collection::vec(0u32..50, 0..60),
        ) {
            let runs: Vec<Vec<SignalSample>> = times
                .chunks(7)
                .map(|chunk| chunk.iter().map(|t| SignalSample::new(*t as f64)).collect())
                .collect();
            let merged = merge_runs(&runs);
            prop_assert!(merged.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
            let mut distinct = times.clone();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(merged.len(), distinct.len());
        }
    }
}
