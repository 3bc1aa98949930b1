//! First-order RC cell law.
//!
//! One RC branch (R1 || C1, time constant tau = R1*C1) in series with the
//! ohmic resistance R0. The branch voltage relaxes toward I*R1:
//!
//! dV_rc/dt = (I*R1 - V_rc) / tau
//!
//! integrated with explicit Euler, and the terminal voltage is
//! V = OCV - I*(R0 + R1) + V_rc.

use crate::traits::{CellLaw, CellSignals};
use cs_core::{MIN_TIME_CONSTANT_S, floor_at};
use cs_scenario::{CellDefinition, CellModelKind, EnvironmentConditions};

#[derive(Debug, Clone, Default)]
pub struct RcLaw {
    branch_voltage_v: f64,
}

impl RcLaw {
    pub fn branch_voltage_v(&self) -> f64 {
        self.branch_voltage_v
    }
}

impl CellLaw for RcLaw {
    fn kind(&self) -> CellModelKind {
        CellModelKind::Rc
    }

    fn model_name(&self) -> &'static str {
        "single_cell_rc"
    }

    fn on_reset(&mut self) {
        self.branch_voltage_v = 0.0;
    }

    fn terminal_voltage(
        &mut self,
        cell: &CellDefinition,
        current_a: f64,
        ocv_v: f64,
        dt: f64,
    ) -> f64 {
        let r0 = floor_at(cell.internal_resistance, 0.0);
        let r1 = floor_at(cell.rc_resistance, 0.0);
        let tau = floor_at(cell.rc_time_constant_s, MIN_TIME_CONSTANT_S);

        let dvdt = (current_a * r1 - self.branch_voltage_v) / tau;
        self.branch_voltage_v += dvdt * dt;

        ocv_v - current_a * (r0 + r1) + self.branch_voltage_v
    }

    fn extra_signals(
        &self,
        _cell: &CellDefinition,
        _environment: &EnvironmentConditions,
        _temperature_c: f64,
        signals: &mut CellSignals<'_>,
    ) {
        signals.put("rc_surface_voltage_v", self.branch_voltage_v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> CellDefinition {
        CellDefinition {
            internal_resistance: 0.015,
            rc_resistance: 0.0045,
            rc_time_constant_s: 8.0,
            ..Default::default()
        }
    }

    #[test]
    fn first_step_sees_full_branch_drop() {
        let mut law = RcLaw::default();
        let v = law.terminal_voltage(&cell(), 10.0, 3.7, 1.0);
        // V_rc = (10*0.0045 - 0)/8 * 1
        let v_rc = 0.045 / 8.0;
        assert!((law.branch_voltage_v() - v_rc).abs() < 1e-12);
        assert!((v - (3.7 - 10.0 * 0.0195 + v_rc)).abs() < 1e-12);
    }

    #[test]
    fn branch_relaxes_toward_steady_state() {
        let mut law = RcLaw::default();
        for _ in 0..500 {
            law.terminal_voltage(&cell(), 10.0, 3.7, 0.5);
        }
        // Steady state: V_rc -> I*R1, so V -> OCV - I*R0
        assert!((law.branch_voltage_v() - 0.045).abs() < 1e-6);
    }

    #[test]
    fn reset_clears_branch() {
        let mut law = RcLaw::default();
        law.terminal_voltage(&cell(), 10.0, 3.7, 1.0);
        law.on_reset();
        assert_eq!(law.branch_voltage_v(), 0.0);
    }

    #[test]
    fn zero_time_constant_is_floored() {
        let mut c = cell();
        c.rc_time_constant_s = 0.0;
        let mut law = RcLaw::default();
        let v = law.terminal_voltage(&c, 1.0, 3.7, 1e-4);
        assert!(v.is_finite());
    }
}
