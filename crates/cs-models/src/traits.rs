//! Core traits for simulation models and cell laws.

use cs_core::{SignalSample, SimResult};
use cs_scenario::{CellDefinition, CellModelKind, EnvironmentConditions, Scenario};

/// A stateful model that turns a scenario into one signal sample per step.
///
/// The solver always calls `configure`, then `reset`, then `step` once per
/// timestep. Models must be deterministic: the same scenario, reset and
/// step sequence yields identical samples.
pub trait SimulationModel: Send {
    /// Model name for registries and diagnostics.
    fn name(&self) -> &str;

    /// Bind the model to one scenario, capturing what it needs by value.
    fn configure(&mut self, scenario: &Scenario) -> SimResult<()>;

    /// Reinitialize per-run mutable state.
    fn reset(&mut self);

    /// Advance internal state by `dt` and return the sample for `time`.
    fn step(&mut self, time: f64, dt: f64) -> SimResult<SignalSample>;
}

/// Variant-specific physics plugged into the shared single-cell step.
///
/// The single-cell model owns state of charge, temperature and drive
/// bookkeeping; a law owns only the state its own equations need.
pub trait CellLaw: Send + std::fmt::Debug {
    fn kind(&self) -> CellModelKind;

    /// Name of the single-cell model running this law.
    fn model_name(&self) -> &'static str;

    /// Reset law-specific state at the start of a run.
    fn on_reset(&mut self) {}

    /// Unclamped terminal voltage for this step. May advance law state.
    fn terminal_voltage(
        &mut self,
        cell: &CellDefinition,
        current_a: f64,
        ocv_v: f64,
        dt: f64,
    ) -> f64;

    /// Cell temperature after this step. Default: tracks ambient.
    fn update_temperature(
        &self,
        _cell: &CellDefinition,
        environment: &EnvironmentConditions,
        _temperature_c: f64,
        _heat_w: f64,
        _dt: f64,
    ) -> f64 {
        environment.ambient_temperature_c
    }

    /// Extra cell-namespaced signals for this step.
    fn extra_signals(
        &self,
        _cell: &CellDefinition,
        _environment: &EnvironmentConditions,
        _temperature_c: f64,
        _signals: &mut CellSignals<'_>,
    ) {
    }
}

/// Writes `<cell_id>.<suffix>` signals into a sample.
pub struct CellSignals<'a> {
    cell_id: &'a str,
    sample: &'a mut SignalSample,
}

impl<'a> CellSignals<'a> {
    pub fn new(cell_id: &'a str, sample: &'a mut SignalSample) -> Self {
        Self { cell_id, sample }
    }

    pub fn put(&mut self, suffix: &str, value: f64) {
        self.sample
            .insert(format!("{}.{}", self.cell_id, suffix), value);
    }
}
