//! Ohmic cell law: OCV minus an instantaneous series drop.

use crate::traits::CellLaw;
use cs_core::floor_at;
use cs_scenario::{CellDefinition, CellModelKind};

#[derive(Debug, Clone, Default)]
pub struct OhmicLaw;

impl CellLaw for OhmicLaw {
    fn kind(&self) -> CellModelKind {
        CellModelKind::Ohmic
    }

    fn model_name(&self) -> &'static str {
        "single_cell_ohmic"
    }

    fn terminal_voltage(
        &mut self,
        cell: &CellDefinition,
        current_a: f64,
        ocv_v: f64,
        _dt: f64,
    ) -> f64 {
        ocv_v - current_a * floor_at(cell.internal_resistance, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_scenario::EnvironmentConditions;

    #[test]
    fn series_drop() {
        let cell = CellDefinition {
            internal_resistance: 0.01,
            ..Default::default()
        };
        let mut law = OhmicLaw;
        let v = law.terminal_voltage(&cell, 10.0, 4.0, 1.0);
        assert!((v - 3.9).abs() < 1e-12);
    }

    #[test]
    fn negative_resistance_floored() {
        let cell = CellDefinition {
            internal_resistance: -0.5,
            ..Default::default()
        };
        let mut law = OhmicLaw;
        assert_eq!(law.terminal_voltage(&cell, 10.0, 4.0, 1.0), 4.0);
    }

    #[test]
    fn temperature_tracks_ambient() {
        let env = EnvironmentConditions {
            ambient_temperature_c: 31.0,
            initial_cell_temperature_c: 10.0,
        };
        let law = OhmicLaw;
        let t = law.update_temperature(&CellDefinition::default(), &env, 10.0, 50.0, 1.0);
        assert_eq!(t, 31.0);
    }
}
