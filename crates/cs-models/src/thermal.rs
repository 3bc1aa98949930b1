//! Lumped thermal cell law.
//!
//! Ohmic voltage law plus a single-node thermal balance:
//!
//! dT/dt = (Q_gen - (T - T_amb) / R_th) / (m * c_p)
//!
//! integrated with explicit Euler and clamped to the cell's operating
//! envelope.

use crate::traits::{CellLaw, CellSignals};
use cs_core::{
    MIN_HEAT_CAPACITY_J_PER_KG_K, MIN_MASS_KG, MIN_THERMAL_RESISTANCE_K_PER_W, floor_at,
};
use cs_scenario::{CellDefinition, CellModelKind, EnvironmentConditions};

pub const MIN_CELL_TEMPERATURE_C: f64 = -40.0;
pub const MAX_CELL_TEMPERATURE_C: f64 = 120.0;

#[derive(Debug, Clone, Default)]
pub struct ThermalLaw;

fn thermal_resistance(cell: &CellDefinition) -> f64 {
    floor_at(cell.thermal_resistance_k_per_w, MIN_THERMAL_RESISTANCE_K_PER_W)
}

/// Heat rejected to ambient (W) at `temperature_c`.
pub fn heat_rejection_w(
    cell: &CellDefinition,
    environment: &EnvironmentConditions,
    temperature_c: f64,
) -> f64 {
    (temperature_c - environment.ambient_temperature_c) / thermal_resistance(cell)
}

impl CellLaw for ThermalLaw {
    fn kind(&self) -> CellModelKind {
        CellModelKind::Thermal
    }

    fn model_name(&self) -> &'static str {
        "single_cell_thermal"
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

    fn update_temperature(
        &self,
        cell: &CellDefinition,
        environment: &EnvironmentConditions,
        temperature_c: f64,
        heat_w: f64,
        dt: f64,
    ) -> f64 {
        let mass = floor_at(cell.mass_kg, MIN_MASS_KG);
        let cp = floor_at(cell.heat_capacity_j_per_kg_k, MIN_HEAT_CAPACITY_J_PER_KG_K);

        let net_heat_w = heat_w - heat_rejection_w(cell, environment, temperature_c);
        let delta = net_heat_w / (mass * cp) * dt;
        (temperature_c + delta).clamp(MIN_CELL_TEMPERATURE_C, MAX_CELL_TEMPERATURE_C)
    }

    fn extra_signals(
        &self,
        cell: &CellDefinition,
        environment: &EnvironmentConditions,
        temperature_c: f64,
        signals: &mut CellSignals<'_>,
    ) {
        signals.put(
            "heat_rejection_w",
            heat_rejection_w(cell, environment, temperature_c),
        );
    }
}
