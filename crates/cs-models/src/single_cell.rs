//! Single-cell electro-thermal model.
//!
//! The shared step algorithm lives here. Everything that differs between
//! cell variants is delegated to a [`CellLaw`].

use crate::drive::{phase_code, sample_at, sample_index};
use crate::ohmic::OhmicLaw;
use crate::rc::RcLaw;
use crate::thermal::ThermalLaw;
use crate::traits::{CellLaw, CellSignals, SimulationModel};
use cs_core::units::{amp_hours_to_coulombs, kph_to_mps, power_kw};
use cs_core::{SignalSample, SimError, SimResult, clamp_unit, floor_at};
use cs_scenario::{CellDefinition, CellModelKind, DriveCycle, EnvironmentConditions, Scenario};

/// Law implementing a cell model kind.
pub fn law_for_kind(kind: CellModelKind) -> Box<dyn CellLaw> {
    match kind {
        CellModelKind::Ohmic => Box::new(OhmicLaw),
        CellModelKind::Rc => Box::new(RcLaw::default()),
        CellModelKind::Thermal => Box::new(ThermalLaw),
    }
}

/// Per-run mutable state shared by every law.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellState {
    pub soc: f64,
    pub temperature_c: f64,
    pub previous_speed_mps: f64,
}

impl Default for CellState {
    fn default() -> Self {
        Self {
            soc: 1.0,
            temperature_c: 25.0,
            previous_speed_mps: 0.0,
        }
    }
}

/// What `configure` captured from the scenario.
#[derive(Clone, Debug)]
struct Binding {
    cell: CellDefinition,
    drive_cycle: DriveCycle,
    environment: EnvironmentConditions,
    time_step: f64,
}

#[derive(Debug)]
pub struct SingleCellModel {
    name: String,
    law: Box<dyn CellLaw>,
    follow_cell_kind: bool,
    binding: Option<Binding>,
    state: CellState,
}

impl SingleCellModel {
    /// Model running a fixed law.
    pub fn with_law(law: Box<dyn CellLaw>) -> Self {
        Self {
            name: law.model_name().to_string(),
            law,
            follow_cell_kind: false,
            binding: None,
            state: CellState::default(),
        }
    }

    pub fn ohmic() -> Self {
        Self::with_law(Box::new(OhmicLaw))
    }

    pub fn rc() -> Self {
        Self::with_law(Box::new(RcLaw::default()))
    }

    pub fn thermal() -> Self {
        Self::with_law(Box::new(ThermalLaw))
    }

    pub fn for_kind(kind: CellModelKind) -> Self {
        Self::with_law(law_for_kind(kind))
    }

    /// Model that picks its law from the active cell's `model_kind` on every
    /// `configure`.
    pub fn matching_cell() -> Self {
        Self {
            name: "single_cell".to_string(),
            law: Box::new(OhmicLaw),
            follow_cell_kind: true,
            binding: None,
            state: CellState::default(),
        }
    }

    pub fn law_kind(&self) -> CellModelKind {
        self.law.kind()
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn is_configured(&self) -> bool {
        self.binding.is_some()
    }
}

fn bind(scenario: &Scenario) -> SimResult<Binding> {
    if scenario.active_cell_id.is_empty() {
        return Err(SimError::configuration("scenario active_cell_id is empty"));
    }
    let cell = scenario.active_cell().ok_or_else(|| {
        SimError::configuration(format!(
            "scenario does not contain active cell definition '{}'",
            scenario.active_cell_id
        ))
    })?;
    if scenario.drive_cycle.samples.is_empty() {
        return Err(SimError::configuration("scenario drive cycle is empty"));
    }
    if scenario.drive_cycle.samples.len() < scenario.step_count {
        return Err(SimError::configuration(format!(
            "drive cycle shorter than requested steps ({} < {})",
            scenario.drive_cycle.samples.len(),
            scenario.step_count
        )));
    }
    Ok(Binding {
        cell: cell.clone(),
        drive_cycle: scenario.drive_cycle.clone(),
        environment: scenario.environment,
        time_step: scenario.time_step,
    })
}

fn demanded_current(cell: &CellDefinition, speed_mps: f64, accel_mps2: f64) -> f64 {
    let raw = cell.base_current_a
        + cell.speed_current_gain * speed_mps
        + cell.accel_current_gain * accel_mps2;
    // Regenerative braking is not modeled.
    raw.max(0.0)
}

fn open_circuit_voltage(cell: &CellDefinition, soc: f64) -> f64 {
    let span = (cell.ocv_max - cell.ocv_min).max(0.0);
    cell.ocv_min + span * clamp_unit(soc)
}

impl SimulationModel for SingleCellModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn configure(&mut self, scenario: &Scenario) -> SimResult<()> {
        let binding = bind(scenario)?;
        if self.follow_cell_kind && self.law.kind() != binding.cell.model_kind {
            self.law = law_for_kind(binding.cell.model_kind);
        }
        tracing::debug!(
            model = %self.name,
            cell = %binding.cell.cell_id,
            law = %self.law.kind(),
            "single-cell model configured"
        );
        self.binding = Some(binding);
        Ok(())
    }

    fn reset(&mut self) {
        let mut state = CellState::default();
        if let Some(binding) = &self.binding {
            state.temperature_c = binding.environment.initial_cell_temperature_c;
            if let Some(first) = binding.drive_cycle.samples.first() {
                state.previous_speed_mps = kph_to_mps(first.speed_kph);
            }
        }
        self.state = state;
        self.law.on_reset();
    }

    fn step(&mut self, time: f64, dt: f64) -> SimResult<SignalSample> {
        let Some(binding) = &self.binding else {
            return Err(SimError::configuration(format!(
                "model '{}' stepped before configure",
                self.name
            )));
        };
        let cell = &binding.cell;
        let environment = &binding.environment;

        let index = sample_index(binding.drive_cycle.samples.len(), time, binding.time_step);
        let drive = sample_at(&binding.drive_cycle, index)
            .ok_or_else(|| SimError::configuration("scenario drive cycle is empty"))?;

        let speed_mps = kph_to_mps(drive.speed_kph);
        let accel_mps2 = (speed_mps - self.state.previous_speed_mps) / binding.time_step;
        self.state.previous_speed_mps = speed_mps;

        let current_a = demanded_current(cell, speed_mps, accel_mps2);
        let ocv_v = open_circuit_voltage(cell, self.state.soc);
        let terminal_v = self
            .law
            .terminal_voltage(cell, current_a, ocv_v, dt)
            .max(0.0);
        let heat_w = current_a * current_a * floor_at(cell.internal_resistance, 0.0);

        let capacity_c = amp_hours_to_coulombs(cell.capacity_ah);
        if capacity_c > 0.0 {
            self.state.soc = clamp_unit(self.state.soc - current_a * dt / capacity_c);
        }
        self.state.temperature_c =
            self.law
                .update_temperature(cell, environment, self.state.temperature_c, heat_w, dt);

        let mut sample = SignalSample::new(time);
        sample.insert("drive.speed_kph", drive.speed_kph);
        sample.insert("drive.distance_m", drive.distance_m);
        sample.insert("drive.accel_mps2", accel_mps2);
        sample.insert("drive.phase_id", phase_code(&drive.phase));

        let mut signals = CellSignals::new(&cell.cell_id, &mut sample);
        signals.put("current_a", current_a);
        signals.put("voltage_v", terminal_v);
        signals.put("ocv_v", ocv_v);
        signals.put("soc", self.state.soc);
        signals.put("temperature_c", self.state.temperature_c);
        signals.put("power_kw", power_kw(terminal_v, current_a));
        signals.put("heat_w", heat_w);
        self.law
            .extra_signals(cell, environment, self.state.temperature_c, &mut signals);

        Ok(sample)
    }
}
