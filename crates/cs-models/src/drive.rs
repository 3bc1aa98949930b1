//! Drive-cycle lookups shared by drive-driven models.

use cs_core::{Real, Tolerances, nearly_equal};
use cs_scenario::{DriveCycle, DriveCycleSample};

/// Index of the drive sample for simulated `time`, clamped to the last
/// sample. A non-positive scenario step always maps to the first sample.
///
/// Times that are a whole number of steps up to rounding error (for
/// example `0.1` added six times) map to that step, not the one before.
pub fn sample_index(cycle_len: usize, time: Real, scenario_time_step: Real) -> usize {
    if scenario_time_step <= 0.0 || cycle_len == 0 {
        return 0;
    }
    let ratio = time / scenario_time_step;
    let steps = if nearly_equal(ratio, ratio.round(), Tolerances::default()) {
        ratio.round()
    } else {
        ratio.floor()
    };
    // Negative or NaN ratios saturate to 0 on the cast.
    (steps as usize).min(cycle_len - 1)
}

pub fn sample_at(cycle: &DriveCycle, index: usize) -> Option<&DriveCycleSample> {
    cycle
        .samples
        .get(index)
        .or_else(|| cycle.samples.last())
}

/// Numeric code for a drive-cycle phase label.
pub fn phase_code(phase: &str) -> f64 {
    match phase {
        "low" => 1.0,
        "medium" => 2.0,
        "high" => 3.0,
        "extra_high" => 4.0,
        _ => 0.0,
    }
}
