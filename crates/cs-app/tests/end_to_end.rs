use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use cs_app::{ExportHeader, Orchestrator, TsvExporter, load_drive_cycle_csv, merge_runs};
use cs_models::SingleCellModel;
use cs_results::JsonlResultStore;
use cs_scenario::{PRESET_IDS, Scenario, cell_preset};
use cs_sim::{EulerSolver, RunEventKind};
use parking_lot::Mutex;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn cell_orchestrator() -> Orchestrator {
    let mut orchestrator = Orchestrator::with_defaults();
    orchestrator.register_model(Box::new(SingleCellModel::matching_cell()));
    orchestrator.register_solver(Box::new(EulerSolver::new()));
    orchestrator
}

#[test]
fn nmc811_reference_run_from_csv() {
    let dir = unique_temp_dir("cs_app_e2e");
    let csv = dir.join("cycle.csv");
    fs::write(&csv, "time_s,phase,speed_kph,distance_m\n0,low,100,0\n1,low,100,27.8\n").unwrap();

    let mut orchestrator = cell_orchestrator();
    let importer = orchestrator.importers().find_for_path(&csv).expect("csv importer");
    assert_eq!(importer.format(), "csv");
    assert_eq!(importer.import_from(&csv).unwrap().samples.len(), 2);

    let cycle = load_drive_cycle_csv(&csv).unwrap();
    let scenario = Scenario::for_cell(cycle, cell_preset("NMC811").unwrap(), 25.0);
    assert_eq!(scenario.time_step, 1.0);

    let record = orchestrator.run(&scenario).unwrap();
    let samples = orchestrator.samples(&record.run_id);
    assert_eq!(samples.len(), 2);

    let s0 = &samples[0];
    assert_eq!(s0.timestamp, 0.0);
    assert_eq!(s0.get("drive.accel_mps2"), Some(0.0));
    assert_eq!(s0.get("drive.phase_id"), Some(1.0));
    assert!((s0.get("NMC811.current_a").unwrap() - 17.2778).abs() < 1e-3);
    assert!((s0.get("NMC811.ocv_v").unwrap() - 4.25).abs() < 1e-12);
    assert!((s0.get("NMC811.voltage_v").unwrap() - 4.0427).abs() < 1e-3);
    assert!((s0.get("NMC811.soc").unwrap() - 0.99904).abs() < 1e-5);
    assert_eq!(s0.get("NMC811.temperature_c"), Some(25.0));
    assert_eq!(samples[1].timestamp, 1.0);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn all_presets_export_to_one_table() {
    let dir = unique_temp_dir("cs_app_export");
    let csv = dir.join("cycle.csv");
    fs::write(
        &csv,
        "time_s,phase,speed_kph,distance_m\n0,low,0,0\n1,low,20,5.6\n2,medium,45,18.1\n3,high,70,37.5\n",
    )
    .unwrap();
    let cycle = load_drive_cycle_csv(&csv).unwrap();

    let mut orchestrator = cell_orchestrator();
    let cells: Vec<_> = PRESET_IDS.iter().filter_map(|id| cell_preset(id)).collect();
    let mut runs = Vec::new();
    for cell in &cells {
        let scenario = Scenario::for_cell(cycle.clone(), cell.clone(), 20.0);
        let record = orchestrator.run(&scenario).unwrap();
        runs.push(orchestrator.samples(&record.run_id));
    }
    assert_eq!(
        orchestrator.result_store().run_ids(),
        vec!["run_1", "run_2", "run_3"]
    );

    let merged = merge_runs(&runs);
    assert_eq!(merged.len(), 4);

    orchestrator
        .exporters_mut()
        .register(Box::new(TsvExporter::with_header(ExportHeader {
            drive_cycle_source: cycle.source.clone(),
            ambient_temperature_c: 20.0,
            cells: cells.clone(),
        })));
    let out = dir.join("results.tsv");
    orchestrator
        .exporters()
        .find_by_format("tsv")
        .unwrap()
        .export_to(&out, &merged)
        .unwrap();

    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "# Cell simulation export");
    assert_eq!(lines[3], "# Cells:");
    assert!(lines[4].starts_with("#   - LFP (LFP, model: rc"));
    let columns: Vec<&str> = lines[7].split('\t').collect();
    assert_eq!(columns[0], "time_s");
    assert!(columns[1].starts_with("drive."));
    assert!(columns.contains(&"LFP.rc_surface_voltage_v"));
    assert!(columns.contains(&"NCA.heat_rejection_w"));
    assert_eq!(lines.len(), 8 + 4);
    assert!(lines[8..].iter().all(|row| row.split('\t').count() == columns.len()));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn runs_persist_in_jsonl_store() {
    let dir = unique_temp_dir("cs_app_store");
    let cycle_csv = dir.join("cycle.csv");
    fs::write(&cycle_csv, "time_s,speed_kph,phase\n0,10,low\n1,20,low\n2,30,low\n").unwrap();
    let scenario = Scenario::for_cell(
        load_drive_cycle_csv(&cycle_csv).unwrap(),
        cell_preset("LFP").unwrap(),
        25.0,
    );

    let mut orchestrator = cell_orchestrator();
    orchestrator.set_result_store(Box::new(JsonlResultStore::open(dir.join("runs")).unwrap()));
    let record = orchestrator.run(&scenario).unwrap();

    let reopened = JsonlResultStore::open(dir.join("runs")).unwrap();
    let manifest = reopened.load_manifest(&record.run_id).unwrap();
    assert_eq!(manifest.sample_count, 3);
    assert_eq!(manifest.scenario_id, scenario.id);
    assert!(manifest.is_complete());
    assert_eq!(
        reopened.load_samples(&record.run_id).unwrap(),
        orchestrator.samples(&record.run_id)
    );

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn orchestrator_bus_reports_lifecycle() {
    let mut orchestrator = cell_orchestrator();
    let kinds = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&kinds);
    orchestrator
        .event_bus()
        .subscribe(move |event| sink.lock().push(event.kind));

    let mut cycle = cs_scenario::DriveCycle::default();
    for t in 0..3 {
        cycle.samples.push(cs_scenario::DriveCycleSample {
            timestamp: t as f64,
            speed_kph: 30.0,
            ..Default::default()
        });
    }
    let scenario = Scenario::for_cell(cycle, cell_preset("NCA").unwrap(), 25.0);
    orchestrator.run(&scenario).unwrap();

    assert_eq!(
        *kinds.lock(),
        vec![
            RunEventKind::Started,
            RunEventKind::Progress,
            RunEventKind::Progress,
            RunEventKind::Progress,
            RunEventKind::Completed,
        ]
    );
}

#[test]
fn validation_failure_leaves_store_untouched() {
    let mut orchestrator = cell_orchestrator();
    let mut scenario = Scenario::for_cell(
        cs_scenario::DriveCycle::default(),
        cell_preset("NMC811").unwrap(),
        25.0,
    );
    scenario.step_count = 10;
    let err = orchestrator.run(&scenario).unwrap_err();
    assert!(err.is_configuration());
    assert!(orchestrator.result_store().run_ids().is_empty());
}
