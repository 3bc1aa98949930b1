//! The composition root that runs scenarios.

use std::mem;

use cs_core::{SignalSample, SimError, SimResult};
use cs_models::SimulationModel;
use cs_results::{InMemoryResultStore, ResultStore, RunRecord};
use cs_scenario::{Scenario, validate_scenario};
use cs_sim::{EventBus, Solver};

use crate::drive_csv::DriveCycleCsvImporter;
use crate::export::TsvExporter;
use crate::plugin::PluginRegistry;
use crate::registry::{ExporterRegistry, ImporterRegistry};

/// Owns the registered models and solvers, the result store, the event bus
/// and the IO and plugin registries.
///
/// The first registered model and solver are the ones used by [`run`].
///
/// [`run`]: Orchestrator::run
pub struct Orchestrator {
    models: Vec<Box<dyn SimulationModel>>,
    solvers: Vec<Box<dyn Solver>>,
    result_store: Box<dyn ResultStore>,
    event_bus: EventBus,
    importers: ImporterRegistry,
    exporters: ExporterRegistry,
    plugins: PluginRegistry,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    /// An empty orchestrator backed by an in-memory result store.
    pub fn new() -> Self {
        Self {
            models: Vec::new(),
            solvers: Vec::new(),
            result_store: Box::new(InMemoryResultStore::new()),
            event_bus: EventBus::new(),
            importers: ImporterRegistry::default(),
            exporters: ExporterRegistry::default(),
            plugins: PluginRegistry::default(),
        }
    }

    /// Like [`Orchestrator::new`] with the drive-cycle CSV importer and the
    /// TSV exporter registered.
    pub fn with_defaults() -> Self {
        let mut orchestrator = Self::new();
        orchestrator
            .importers
            .register(Box::new(DriveCycleCsvImporter));
        orchestrator.exporters.register(Box::new(TsvExporter::new()));
        orchestrator
    }

    pub fn register_model(&mut self, model: Box<dyn SimulationModel>) {
        tracing::debug!(model = model.name(), "registered model");
        self.models.push(model);
    }

    pub fn register_solver(&mut self, solver: Box<dyn Solver>) {
        tracing::debug!(solver = solver.name(), "registered solver");
        self.solvers.push(solver);
    }

    pub fn model_names(&self) -> Vec<String> {
        self.models.iter().map(|m| m.name().to_string()).collect()
    }

    pub fn solver_names(&self) -> Vec<String> {
        self.solvers.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn set_result_store(&mut self, store: Box<dyn ResultStore>) {
        self.result_store = store;
    }

    pub fn result_store(&self) -> &dyn ResultStore {
        self.result_store.as_ref()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn importers(&self) -> &ImporterRegistry {
        &self.importers
    }

    pub fn importers_mut(&mut self) -> &mut ImporterRegistry {
        &mut self.importers
    }

    pub fn exporters(&self) -> &ExporterRegistry {
        &self.exporters
    }

    pub fn exporters_mut(&mut self) -> &mut ExporterRegistry {
        &mut self.exporters
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    /// Runs the registration hook of every registered plugin against this
    /// orchestrator. Plugins registered by a hook are kept but not
    /// initialized in the same pass.
    pub fn initialize_plugins(&mut self) -> SimResult<()> {
        let mut plugins = mem::take(&mut self.plugins);
        let outcome = plugins.initialize_all(self);
        plugins.append(mem::take(&mut self.plugins));
        self.plugins = plugins;
        outcome
    }

    /// Executes `scenario` with the first registered model and solver.
    ///
    /// Fails with a configuration error before opening a run when no model or
    /// solver is registered or the scenario is structurally invalid. A run
    /// whose solver fails stays in the store without being completed.
    pub fn run(&mut self, scenario: &Scenario) -> SimResult<RunRecord> {
        let Some(model) = self.models.first_mut() else {
            return Err(SimError::configuration("no models registered"));
        };
        let Some(solver) = self.solvers.first_mut() else {
            return Err(SimError::configuration("no solvers registered"));
        };
        validate_scenario(scenario)?;

        let record = self.result_store.start_run(scenario)?;
        tracing::info!(
            run_id = %record.run_id,
            scenario_id = %scenario.id,
            steps = scenario.step_count,
            model = model.name(),
            solver = solver.name(),
            "run started"
        );

        solver.solve(
            model.as_mut(),
            scenario,
            &record,
            self.result_store.as_mut(),
            &self.event_bus,
        )?;
        self.result_store.complete_run(&record)?;

        tracing::info!(run_id = %record.run_id, scenario_id = %scenario.id, "run completed");
        Ok(record)
    }

    /// Samples of a finished or running run; empty for unknown ids.
    pub fn samples(&self, run_id: &str) -> Vec<SignalSample> {
        self.result_store.samples(run_id)
    }
}
