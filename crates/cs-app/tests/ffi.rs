use std::ptr;

use cs_app::ffi::{
    CELLSIM_NULL_HANDLE, CELLSIM_OK, CELLSIM_RUN_FAILED, cellsim_create_orchestrator,
    cellsim_destroy_orchestrator, cellsim_run_default_scenario,
};

#[test]
fn default_scenario_status_codes() {
    let handle = cellsim_create_orchestrator();
    assert!(!handle.is_null());

    unsafe {
        assert_eq!(cellsim_run_default_scenario(handle, 0.1, 10), CELLSIM_OK);
        assert_eq!(cellsim_run_default_scenario(handle, 1.0, 0), CELLSIM_OK);
        assert_eq!(cellsim_run_default_scenario(handle, 0.0, 10), CELLSIM_RUN_FAILED);
        assert_eq!(cellsim_run_default_scenario(handle, -1.0, 10), CELLSIM_RUN_FAILED);

        let orchestrator = (*handle).orchestrator();
        assert_eq!(orchestrator.model_names(), vec!["battery_pack"]);
        assert_eq!(orchestrator.result_store().run_ids().len(), 2);
        let samples = orchestrator.samples("run_1");
        assert_eq!(samples.len(), 10);
        assert!(samples[9].get("pack.soc").unwrap() < 1.0);

        cellsim_destroy_orchestrator(handle);
    }
}

#[test]
fn null_handle_is_reported() {
    unsafe {
        assert_eq!(
            cellsim_run_default_scenario(ptr::null_mut(), 0.1, 10),
            CELLSIM_NULL_HANDLE
        );
        cellsim_destroy_orchestrator(ptr::null_mut());
    }
}
