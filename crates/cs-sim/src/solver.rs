//! Solver capability and the fixed-step explicit Euler solver.

use cs_core::{SimError, SimResult, ensure_finite};
use cs_models::SimulationModel;
use cs_results::{ResultStore, RunRecord};
use cs_scenario::Scenario;

use crate::events::{EventBus, RunEvent, RunEventKind};

/// Drives a configured model through a scenario, appending every sample to
/// the run and reporting progress on the bus.
pub trait Solver: Send {
    fn name(&self) -> &str;

    fn solve(
        &mut self,
        model: &mut dyn SimulationModel,
        scenario: &Scenario,
        record: &RunRecord,
        store: &mut dyn ResultStore,
        bus: &EventBus,
    ) -> SimResult<()>;
}

/// Steps the model `step_count` times at the scenario's fixed time step.
///
/// Emits `Started`, one `Progress` per step and `Completed`. When the model
/// or store fails, a `Failed` event carrying the error text is published and
/// the error is returned as is.
#[derive(Debug, Clone, Default)]
pub struct EulerSolver;

impl EulerSolver {
    pub const NAME: &'static str = "euler_solver";

    pub fn new() -> Self {
        Self
    }

    fn drive(
        model: &mut dyn SimulationModel,
        scenario: &Scenario,
        record: &RunRecord,
        store: &mut dyn ResultStore,
        bus: &EventBus,
        time: &mut f64,
    ) -> SimResult<()> {
        model.configure(scenario)?;
        model.reset();

        bus.publish(
            &RunEvent::new(RunEventKind::Started, record.run_id.clone(), *time)
                .with_message(scenario.id.clone()),
        );

        let steps = scenario.step_count;
        let dt = scenario.time_step;
        for step in 0..steps {
            // Times come from the step index so they stay on the grid.
            *time = step as f64 * dt;
            let sample = model.step(*time, dt)?;
            store.append_sample(record, sample)?;
            *time = (step + 1) as f64 * dt;

            let progress = (step + 1) as f64 / steps as f64;
            bus.publish(
                &RunEvent::new(RunEventKind::Progress, record.run_id.clone(), *time)
                    .with_progress(progress),
            );
        }

        bus.publish(
            &RunEvent::new(RunEventKind::Completed, record.run_id.clone(), *time)
                .with_progress(1.0),
        );
        Ok(())
    }
}

impl Solver for EulerSolver {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn solve(
        &mut self,
        model: &mut dyn SimulationModel,
        scenario: &Scenario,
        record: &RunRecord,
        store: &mut dyn ResultStore,
        bus: &EventBus,
    ) -> SimResult<()> {
        if ensure_finite(scenario.time_step, "time step")? <= 0.0 {
            return Err(SimError::configuration(format!(
                "time step must be positive, got {}",
                scenario.time_step
            )));
        }

        tracing::debug!(
            run_id = %record.run_id,
            model = model.name(),
            steps = scenario.step_count,
            dt = scenario.time_step,
            "euler solve"
        );

        let mut time = 0.0;
        let outcome = Self::drive(model, scenario, record, store, bus, &mut time);
        if let Err(err) = &outcome {
            tracing::warn!(run_id = %record.run_id, error = %err, sim_time_s = time, "run failed");
            bus.publish(
                &RunEvent::new(RunEventKind::Failed, record.run_id.clone(), time)
                    .with_message(err.to_string()),
            );
        }
        outcome
    }
}
