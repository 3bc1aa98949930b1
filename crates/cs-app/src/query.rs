//! Query helpers for extracting data from stored runs.

use cs_core::SignalSample;

use crate::error::{AppError, AppResult};
use crate::export::order_columns;

/// Summary of a run's time range and signals.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub sample_count: usize,
    pub signal_count: usize,
}

/// Get run summary from stored samples.
pub fn run_summary(samples: &[SignalSample]) -> AppResult<RunSummary> {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Err(AppError::InvalidInput("No samples in run".to_string()));
    };

    Ok(RunSummary {
        time_range: (first.timestamp, last.timestamp),
        sample_count: samples.len(),
        signal_count: list_signals(samples).len(),
    })
}

/// All signal names appearing in a run, in export column order.
pub fn list_signals(samples: &[SignalSample]) -> Vec<String> {
    order_columns(samples.iter().flat_map(|s| s.signal_names()))
}

/// Extract `(time, value)` pairs for one signal. Samples without the signal
/// are skipped.
pub fn extract_signal(samples: &[SignalSample], signal: &str) -> AppResult<Vec<(f64, f64)>> {
    let series: Vec<(f64, f64)> = samples
        .iter()
        .filter_map(|s| s.get(signal).map(|value| (s.timestamp, value)))
        .collect();

    if series.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Signal '{}' not found in run",
            signal
        )));
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<SignalSample> {
        (0..4)
            .map(|i| {
                let mut s = SignalSample::new(i as f64 * 0.5);
                s.insert("drive.speed_kph", i as f64 * 10.0);
                s.insert("LFP.voltage_v", 3.3 - i as f64 * 0.01);
                if i % 2 == 0 {
                    s.insert("LFP.rc_surface_voltage_v", 0.0);
                }
                s
            })
            .collect()
    }

    #[test]
    fn summary_spans_first_to_last() {
        let summary = run_summary(&samples()).unwrap();
        assert_eq!(summary.time_range, (0.0, 1.5));
        assert_eq!(summary.sample_count, 4);
        assert_eq!(summary.signal_count, 3);
        assert!(run_summary(&[]).is_err());
    }

    #[test]
    fn extract_skips_missing_values() {
        let series = extract_signal(&samples(), "LFP.rc_surface_voltage_v").unwrap();
        assert_eq!(series, vec![(0.0, 0.0), (1.0, 0.0)]);
        assert!(extract_signal(&samples(), "LFP.heat_w").is_err());
    }

    #[test]
    fn signals_listed_in_column_order() {
        assert_eq!(
            list_signals(&samples()),
            vec!["drive.speed_kph", "LFP.rc_surface_voltage_v", "LFP.voltage_v"]
        );
    }
}
