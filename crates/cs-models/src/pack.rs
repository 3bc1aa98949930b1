//! Constant-current battery pack discharge model.
//!
//! Drive-cycle independent: the pack draws a fixed current configured
//! through scenario parameters. Used as the default model of embedded
//! orchestrators, whose scenarios carry no cell definitions.

use crate::traits::SimulationModel;
use cs_core::units::{constants::SECONDS_PER_HOUR, power_kw};
use cs_core::{SignalSample, SimResult, clamp_unit};
use cs_scenario::Scenario;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackParameters {
    pub nominal_voltage: f64,
    pub capacity_kwh: f64,
    pub internal_resistance: f64,
    pub current_draw: f64,
}

impl Default for PackParameters {
    fn default() -> Self {
        Self {
            nominal_voltage: 400.0,
            capacity_kwh: 85.0,
            internal_resistance: 0.05,
            current_draw: 60.0,
        }
    }
}

impl PackParameters {
    /// Defaults overridden by any matching scenario parameters.
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let defaults = Self::default();
        Self {
            nominal_voltage: scenario
                .parameter("nominal_voltage")
                .unwrap_or(defaults.nominal_voltage),
            capacity_kwh: scenario
                .parameter("capacity_kwh")
                .unwrap_or(defaults.capacity_kwh),
            internal_resistance: scenario
                .parameter("internal_resistance")
                .unwrap_or(defaults.internal_resistance),
            current_draw: scenario
                .parameter("current_draw")
                .unwrap_or(defaults.current_draw),
        }
    }
}

#[derive(Debug)]
pub struct BatteryPackModel {
    params: PackParameters,
    soc: f64,
}

impl Default for BatteryPackModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BatteryPackModel {
    pub fn new() -> Self {
        Self {
            params: PackParameters::default(),
            soc: 1.0,
        }
    }

    pub fn parameters(&self) -> PackParameters {
        self.params
    }

    pub fn soc(&self) -> f64 {
        self.soc
    }
}

impl SimulationModel for BatteryPackModel {
    fn name(&self) -> &str {
        "battery_pack"
    }

    fn configure(&mut self, scenario: &Scenario) -> SimResult<()> {
        self.params = PackParameters::from_scenario(scenario);
        tracing::debug!(params = ?self.params, "battery pack configured");
        Ok(())
    }

    fn reset(&mut self) {
        self.soc = 1.0;
    }

    fn step(&mut self, time: f64, dt: f64) -> SimResult<SignalSample> {
        let p = &self.params;
        let discharge_kw = power_kw(p.nominal_voltage, p.current_draw);
        if p.capacity_kwh > 0.0 {
            let energy_kwh = discharge_kw * dt / SECONDS_PER_HOUR;
            self.soc = clamp_unit(self.soc - energy_kwh / p.capacity_kwh);
        }

        let mut sample = SignalSample::new(time);
        sample.insert(
            "pack.voltage",
            p.nominal_voltage - p.current_draw * p.internal_resistance,
        );
        sample.insert("pack.current", p.current_draw);
        sample.insert("pack.soc", self.soc);
        sample.insert("pack.power_kw", discharge_kw);
        Ok(sample)
    }
}
