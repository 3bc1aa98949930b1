//! Battery cell simulation models for cellsim.
//!
//! Provides:
//! - `SimulationModel`, the configure/reset/step capability solvers drive
//! - `SingleCellModel` with pluggable cell laws (ohmic, RC, lumped thermal)
//! - `BatteryPackModel`, a constant-current pack discharge

pub mod drive;
pub mod ohmic;
pub mod pack;
pub mod rc;
pub mod single_cell;
pub mod thermal;
pub mod traits;

// Re-exports for public API
pub use ohmic::OhmicLaw;
pub use pack::{BatteryPackModel, PackParameters};
pub use rc::RcLaw;
pub use single_cell::{CellState, SingleCellModel, law_for_kind};
pub use thermal::{MAX_CELL_TEMPERATURE_C, MIN_CELL_TEMPERATURE_C, ThermalLaw};
pub use traits::{CellLaw, CellSignals, SimulationModel};
