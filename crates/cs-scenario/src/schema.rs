//! Scenario schema definitions.

use serde::{Deserialize, Serialize};

/// Which cell law a cell definition asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellModelKind {
    #[default]
    Ohmic,
    Rc,
    Thermal,
}

impl CellModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellModelKind::Ohmic => "ohmic",
            CellModelKind::Rc => "rc",
            CellModelKind::Thermal => "thermal",
        }
    }
}

impl std::fmt::Display for CellModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DriveCycleSample {
    pub timestamp: f64,
    pub speed_kph: f64,
    pub distance_m: f64,
    pub grade_percent: f64,
    pub phase: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DriveCycle {
    pub id: String,
    pub description: String,
    pub source: String,
    pub sample_interval: f64,
    pub samples: Vec<DriveCycleSample>,
}

impl Default for DriveCycle {
    fn default() -> Self {
        Self {
            id: String::new(),
            description: String::new(),
            source: String::new(),
            sample_interval: 1.0,
            samples: Vec::new(),
        }
    }
}

impl DriveCycle {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnvironmentConditions {
    pub ambient_temperature_c: f64,
    pub initial_cell_temperature_c: f64,
}

impl Default for EnvironmentConditions {
    fn default() -> Self {
        Self {
            ambient_temperature_c: 25.0,
            initial_cell_temperature_c: 25.0,
        }
    }
}

impl EnvironmentConditions {
    /// Ambient and initial cell temperature both at `temperature_c`.
    pub fn uniform(temperature_c: f64) -> Self {
        Self {
            ambient_temperature_c: temperature_c,
            initial_cell_temperature_c: temperature_c,
        }
    }
}

/// Static physical parameters of one cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CellDefinition {
    pub cell_id: String,
    pub chemistry: String,
    pub model_kind: CellModelKind,
    pub nominal_voltage: f64,
    pub capacity_ah: f64,
    pub internal_resistance: f64,
    pub rc_time_constant_s: f64,
    pub rc_resistance: f64,
    pub mass_kg: f64,
    pub heat_capacity_j_per_kg_k: f64,
    pub thermal_resistance_k_per_w: f64,
    pub surface_area_m2: f64,
    pub base_current_a: f64,
    pub speed_current_gain: f64,
    pub accel_current_gain: f64,
    pub ocv_min: f64,
    pub ocv_max: f64,
}

impl Default for CellDefinition {
    fn default() -> Self {
        Self {
            cell_id: String::new(),
            chemistry: String::new(),
            model_kind: CellModelKind::Ohmic,
            nominal_voltage: 3.7,
            capacity_ah: 5.0,
            internal_resistance: 0.015,
            rc_time_constant_s: 10.0,
            rc_resistance: 0.005,
            mass_kg: 0.045,
            heat_capacity_j_per_kg_k: 900.0,
            thermal_resistance_k_per_w: 1.5,
            surface_area_m2: 0.01,
            base_current_a: 2.0,
            speed_current_gain: 0.4,
            accel_current_gain: 2.5,
            ocv_min: 3.0,
            ocv_max: 4.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ScenarioParameter {
    pub name: String,
    pub value: f64,
}

/// A fully specified simulation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Scenario {
    pub id: String,
    pub description: String,
    pub time_step: f64,
    pub step_count: usize,
    pub parameters: Vec<ScenarioParameter>,
    pub cells: Vec<CellDefinition>,
    pub active_cell_id: String,
    pub drive_cycle: DriveCycle,
    pub environment: EnvironmentConditions,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            id: String::new(),
            description: String::new(),
            time_step: 0.1,
            step_count: 0,
            parameters: Vec::new(),
            cells: Vec::new(),
            active_cell_id: String::new(),
            drive_cycle: DriveCycle::default(),
            environment: EnvironmentConditions::default(),
        }
    }
}

impl Scenario {
    pub fn duration(&self) -> f64 {
        self.time_step * self.step_count as f64
    }

    /// The cell named by `active_cell_id`, if any.
    pub fn active_cell(&self) -> Option<&CellDefinition> {
        if self.active_cell_id.is_empty() {
            return None;
        }
        self.cells.iter().find(|c| c.cell_id == self.active_cell_id)
    }

    /// First parameter with the given name.
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.parameters.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.parameters.push(ScenarioParameter { name, value }),
        }
    }

    /// Single-cell scenario covering the whole drive cycle at its own sample
    /// interval.
    pub fn for_cell(drive_cycle: DriveCycle, cell: CellDefinition, ambient_c: f64) -> Self {
        Self {
            id: format!("{}_{}", cell.cell_id, drive_cycle.id),
            description: format!("Drive-cycle single-cell simulation for {}", cell.cell_id),
            time_step: drive_cycle.sample_interval,
            step_count: drive_cycle.samples.len(),
            parameters: Vec::new(),
            active_cell_id: cell.cell_id.clone(),
            cells: vec![cell],
            drive_cycle,
            environment: EnvironmentConditions::uniform(ambient_c),
        }
    }
}
