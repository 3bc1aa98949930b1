//! Default cell parameter presets.

use crate::schema::{CellDefinition, CellModelKind};

/// Identifiers of the built-in presets, in listing order.
pub const PRESET_IDS: [&str; 3] = ["LFP", "NCA", "NMC811"];

/// Built-in preset by id (case-sensitive).
pub fn cell_preset(id: &str) -> Option<CellDefinition> {
    match id {
        "NMC811" => Some(CellDefinition {
            cell_id: "NMC811".to_string(),
            chemistry: "NMC811".to_string(),
            model_kind: CellModelKind::Ohmic,
            nominal_voltage: 3.65,
            capacity_ah: 5.0,
            internal_resistance: 0.012,
            base_current_a: 2.0,
            speed_current_gain: 0.55,
            accel_current_gain: 3.0,
            ocv_min: 3.0,
            ocv_max: 4.25,
            rc_time_constant_s: 0.0,
            rc_resistance: 0.0,
            mass_kg: 0.0,
            surface_area_m2: 0.0,
            heat_capacity_j_per_kg_k: 0.0,
            thermal_resistance_k_per_w: 0.0,
        }),
        "LFP" => Some(CellDefinition {
            cell_id: "LFP".to_string(),
            chemistry: "LFP".to_string(),
            model_kind: CellModelKind::Rc,
            nominal_voltage: 3.2,
            capacity_ah: 4.8,
            internal_resistance: 0.015,
            base_current_a: 2.5,
            speed_current_gain: 0.6,
            accel_current_gain: 3.5,
            ocv_min: 2.9,
            ocv_max: 3.7,
            rc_time_constant_s: 8.0,
            rc_resistance: 0.0045,
            mass_kg: 0.0,
            surface_area_m2: 0.0,
            heat_capacity_j_per_kg_k: 0.0,
            thermal_resistance_k_per_w: 0.0,
        }),
        "NCA" => Some(CellDefinition {
            cell_id: "NCA".to_string(),
            chemistry: "NCA".to_string(),
            model_kind: CellModelKind::Thermal,
            nominal_voltage: 3.6,
            capacity_ah: 4.5,
            internal_resistance: 0.011,
            base_current_a: 3.0,
            speed_current_gain: 0.65,
            accel_current_gain: 4.0,
            ocv_min: 3.1,
            ocv_max: 4.15,
            rc_time_constant_s: 0.0,
            rc_resistance: 0.0,
            mass_kg: 0.047,
            surface_area_m2: 0.013,
            heat_capacity_j_per_kg_k: 910.0,
            thermal_resistance_k_per_w: 1.2,
        }),
        _ => None,
    }
}

/// All built-in presets, ordered by id.
pub fn default_cell_presets() -> Vec<CellDefinition> {
    PRESET_IDS.iter().filter_map(|id| cell_preset(id)).collect()
}
