//! Composition root for cell simulations.
//!
//! This crate wires models, solvers and result stores into an
//! [`Orchestrator`], and provides the file formats and embedding API shared
//! by the command-line front end and native hosts.

pub mod drive_csv;
pub mod error;
pub mod export;
pub mod ffi;
pub mod orchestrator;
pub mod plugin;
pub mod query;
pub mod registry;

pub use drive_csv::{DriveCycleCsvImporter, load_drive_cycle_csv, parse_drive_cycle_csv};
pub use error::{AppError, AppResult};
pub use export::{ExportHeader, TsvExporter, merge_runs, order_columns, write_tabular};
pub use orchestrator::Orchestrator;
pub use plugin::{Plugin, PluginRegistry};
pub use query::{RunSummary, extract_signal, list_signals, run_summary};
pub use registry::{DataExporter, DataImporter, ExporterRegistry, ImportedDataset, ImporterRegistry};
