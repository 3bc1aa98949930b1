//! Time stepping and run event broadcast for cell simulations.
//!
//! Provides:
//! - `EventBus` for run lifecycle notifications
//! - `Solver` capability with a fixed-step explicit Euler implementation

pub mod events;
pub mod solver;

pub use events::{EventBus, EventCallback, RunEvent, RunEventKind};
pub use solver::{EulerSolver, Solver};
