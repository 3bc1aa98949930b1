//! Scenario validation logic.

use crate::schema::Scenario;
use cs_core::SimError;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl From<ValidationError> for SimError {
    fn from(err: ValidationError) -> Self {
        SimError::configuration(err.to_string())
    }
}

/// Structural checks on a scenario. Physical plausibility is not checked.
pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if !scenario.time_step.is_finite() || scenario.time_step <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "time_step".to_string(),
            value: scenario.time_step.to_string(),
            reason: "must be finite and positive".to_string(),
        });
    }

    let mut cell_ids = HashSet::new();
    for cell in &scenario.cells {
        if !cell_ids.insert(cell.cell_id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: cell.cell_id.clone(),
                context: "cells".to_string(),
            });
        }
    }

    if !scenario.active_cell_id.is_empty() {
        if !cell_ids.contains(scenario.active_cell_id.as_str()) {
            return Err(ValidationError::MissingReference {
                id: scenario.active_cell_id.clone(),
                context: "active_cell_id".to_string(),
            });
        }
        if scenario.drive_cycle.samples.len() < scenario.step_count {
            return Err(ValidationError::InvalidValue {
                field: "step_count".to_string(),
                value: scenario.step_count.to_string(),
                reason: format!(
                    "drive cycle only has {} samples",
                    scenario.drive_cycle.samples.len()
                ),
            });
        }
    }

    validate_drive_cycle(scenario)
}

fn validate_drive_cycle(scenario: &Scenario) -> Result<(), ValidationError> {
    let cycle = &scenario.drive_cycle;
    if cycle.samples.is_empty() {
        return Ok(());
    }
    if !cycle.sample_interval.is_finite() || cycle.sample_interval <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "drive_cycle.sample_interval".to_string(),
            value: cycle.sample_interval.to_string(),
            reason: "must be finite and positive".to_string(),
        });
    }
    for (i, pair) in cycle.samples.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(ValidationError::InvalidValue {
                field: format!("drive_cycle.samples[{}].timestamp", i + 1),
                value: pair[1].timestamp.to_string(),
                reason: "timestamps must be non-decreasing".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CellDefinition, DriveCycle, DriveCycleSample};

    fn cell(id: &str) -> CellDefinition {
        CellDefinition {
            cell_id: id.to_string(),
            ..Default::default()
        }
    }

    fn cycle(n: usize) -> DriveCycle {
        DriveCycle {
            samples: (0..n)
                .map(|i| DriveCycleSample {
                    timestamp: i as f64,
                    speed_kph: 10.0,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn scenario() -> Scenario {
        Scenario {
            time_step: 1.0,
            step_count: 3,
            cells: vec![cell("a")],
            active_cell_id: "a".to_string(),
            drive_cycle: cycle(3),
            ..Default::default()
        }
    }

    #[test]
    fn valid_scenario_passes() {
        validate_scenario(&scenario()).unwrap();
    }

    #[test]
    fn zero_time_step_rejected() {
        let mut s = scenario();
        s.time_step = 0.0;
        let err = validate_scenario(&s).unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "time_step")
        );
    }

    #[test]
    fn duplicate_cell_rejected() {
        let mut s = scenario();
        s.cells.push(cell("a"));
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn missing_active_cell_rejected() {
        let mut s = scenario();
        s.active_cell_id = "zzz".to_string();
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn short_drive_cycle_rejected() {
        let mut s = scenario();
        s.step_count = 4;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn decreasing_timestamps_rejected() {
        let mut s = scenario();
        s.drive_cycle.samples[2].timestamp = 0.5;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn cell_free_scenario_passes() {
        let s = Scenario {
            time_step: 1.0,
            step_count: 10,
            ..Default::default()
        };
        validate_scenario(&s).unwrap();
    }

    #[test]
    fn converts_to_configuration_error() {
        let mut s = scenario();
        s.time_step = -1.0;
        let err: SimError = validate_scenario(&s).unwrap_err().into();
        assert!(err.is_configuration());
    }
}
