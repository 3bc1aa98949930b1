//! C ABI for embedding the simulator in native hosts.
//!
//! Status codes: `0` success, `-1` null handle, `-2` the run failed or
//! panicked. See `include/cellsim.h`.

use std::ffi::c_int;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use cs_models::BatteryPackModel;
use cs_scenario::Scenario;
use cs_sim::EulerSolver;

use crate::orchestrator::Orchestrator;

pub const CELLSIM_OK: c_int = 0;
pub const CELLSIM_NULL_HANDLE: c_int = -1;
pub const CELLSIM_RUN_FAILED: c_int = -2;

/// Opaque handle owned by the host between create and destroy.
pub struct CellsimOrchestrator {
    orchestrator: Orchestrator,
}

impl CellsimOrchestrator {
    fn new() -> Self {
        let mut orchestrator = Orchestrator::new();
        orchestrator.register_model(Box::new(BatteryPackModel::new()));
        orchestrator.register_solver(Box::new(EulerSolver::new()));
        Self { orchestrator }
    }

    /// The wrapped orchestrator, for hosts linking the Rust API directly.
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}

fn default_scenario(time_step: f64, steps: u32) -> Scenario {
    Scenario {
        id: "default".to_string(),
        description: "Default battery pack discharge".to_string(),
        time_step,
        step_count: steps as usize,
        ..Default::default()
    }
}

/// Creates an orchestrator preloaded with the battery pack model and the
/// Euler solver. Returns null if construction fails.
#[unsafe(no_mangle)]
pub extern "C" fn cellsim_create_orchestrator() -> *mut CellsimOrchestrator {
    match panic::catch_unwind(CellsimOrchestrator::new) {
        Ok(handle) => Box::into_raw(Box::new(handle)),
        Err(_) => ptr::null_mut(),
    }
}

/// Destroys a handle from [`cellsim_create_orchestrator`]. Null is ignored.
///
/// # Safety
///
/// `handle` must be null or a pointer returned by
/// [`cellsim_create_orchestrator`] that has not been destroyed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cellsim_destroy_orchestrator(handle: *mut CellsimOrchestrator) {
    if !handle.is_null() {
        drop(unsafe { Box::from_raw(handle) });
    }
}

/// Runs the default pack discharge scenario with `steps` steps of
/// `time_step` seconds.
///
/// # Safety
///
/// `handle` must be null or a live pointer returned by
/// [`cellsim_create_orchestrator`], not used concurrently from another
/// thread.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cellsim_run_default_scenario(
    handle: *mut CellsimOrchestrator,
    time_step: f64,
    steps: u32,
) -> c_int {
    let Some(holder) = (unsafe { handle.as_mut() }) else {
        return CELLSIM_NULL_HANDLE;
    };
    let scenario = default_scenario(time_step, steps);
    match panic::catch_unwind(AssertUnwindSafe(|| holder.orchestrator.run(&scenario))) {
        Ok(Ok(record)) => {
            tracing::debug!(run_id = %record.run_id, "default scenario finished");
            CELLSIM_OK
        }
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "default scenario failed");
            CELLSIM_RUN_FAILED
        }
        Err(_) => {
            tracing::warn!("default scenario panicked");
            CELLSIM_RUN_FAILED
        }
    }
}
