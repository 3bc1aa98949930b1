//! Plugins contribute models, solvers and IO adapters to an orchestrator.

use cs_core::SimResult;

use crate::orchestrator::Orchestrator;

pub trait Plugin: Send {
    fn name(&self) -> &str;

    /// Registers this plugin's components on `orchestrator`.
    fn register_components(&self, orchestrator: &mut Orchestrator) -> SimResult<()>;
}

/// Plugins in registration order.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        tracing::debug!(plugin = plugin.name(), "registered plugin");
        self.plugins.push(plugin);
    }

    pub fn names(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Runs every plugin's registration hook once, stopping at the first
    /// failure.
    pub fn initialize_all(&self, orchestrator: &mut Orchestrator) -> SimResult<()> {
        for plugin in &self.plugins {
            tracing::debug!(plugin = plugin.name(), "initializing plugin");
            plugin.register_components(orchestrator)?;
        }
        Ok(())
    }

    pub(crate) fn append(&mut self, other: PluginRegistry) {
        self.plugins.extend(other.plugins);
    }
}
