//! cs-core: shared foundation for cellsim.
//!
//! Contains:
//! - error (the simulation error taxonomy shared by every crate)
//! - numeric (Real + tolerances + degenerate-parameter floors)
//! - units (uom SI conversions for drive and cell quantities)
//! - sample (the timestamped signal map produced by models)

pub mod error;
pub mod numeric;
pub mod sample;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{SimError, SimResult};
pub use numeric::*;
pub use sample::SignalSample;
