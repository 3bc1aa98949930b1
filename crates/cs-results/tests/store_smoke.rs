use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use cs_core::{SignalSample, SimError};
use cs_results::*;
use cs_scenario::Scenario;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("{}_{}", prefix, nanos))
}

fn scenario(id: &str) -> Scenario {
    Scenario {
        id: id.to_string(),
        ..Default::default()
    }
}

fn sample(t: f64, v: f64) -> SignalSample {
    let mut s = SignalSample::new(t);
    s.insert("cell.voltage_v", v);
    s
}

fn unknown_record() -> RunRecord {
    RunRecord::new("run_999".to_string(), &scenario("ghost"))
}

fn assert_unknown_run_asymmetry(store: &mut dyn ResultStore) {
    let err = store
        .append_sample(&unknown_record(), sample(0.0, 1.0))
        .unwrap_err();
    assert!(matches!(err, SimError::UnknownRun { ref run_id } if run_id == "run_999"));
    assert!(err.is_configuration());
    assert!(store.samples("run_999").is_empty());
    assert!(store.complete_run(&unknown_record()).is_err());
}

#[test]
fn in_memory_unknown_run_reads_empty_but_rejects_writes() {
    assert_unknown_run_asymmetry(&mut InMemoryResultStore::new());
}

#[test]
fn jsonl_unknown_run_reads_empty_but_rejects_writes() {
    let root = unique_temp_dir("cs_results_unknown");
    let mut store = JsonlResultStore::open(&root).expect("open store");
    assert_unknown_run_asymmetry(&mut store);
    let _ = fs::remove_dir_all(root);
}

#[test]
fn jsonl_store_persists_across_reopen() {
    let root = unique_temp_dir("cs_results_reopen");

    let first = {
        let mut store = JsonlResultStore::open(&root).expect("open store");
        let record = store.start_run(&scenario("nmc")).expect("start run");
        assert_eq!(record.run_id, "run_1");
        store.append_sample(&record, sample(0.0, 4.04)).unwrap();
        store.append_sample(&record, sample(1.0, 4.03)).unwrap();
        assert!(!store.is_complete(&record.run_id));
        store.complete_run(&record).unwrap();
        record
    };

    let mut store = JsonlResultStore::open(&root).expect("reopen store");
    assert_eq!(store.run_ids(), vec!["run_1".to_string()]);
    assert!(store.is_complete("run_1"));

    let manifest = store.load_manifest("run_1").unwrap();
    assert_eq!(manifest.scenario_id, "nmc");
    assert_eq!(manifest.sample_count, 2);
    assert_eq!(manifest.fingerprint, first.fingerprint);
    assert!(manifest.completed_at.is_some());

    let samples = store.samples("run_1");
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[1].get("cell.voltage_v"), Some(4.03));

    let second = store.start_run(&scenario("lfp")).unwrap();
    assert_eq!(second.run_id, "run_2");
    assert_eq!(store.run_ids(), vec!["run_1".to_string(), "run_2".to_string()]);
    assert!(!store.is_complete("run_2"));

    let manifests = store.list_manifests().unwrap();
    assert_eq!(manifests.len(), 2);
    assert_eq!(manifests[1].scenario_id, "lfp");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn jsonl_samples_are_readable_before_completion() {
    let root = unique_temp_dir("cs_results_live");
    let mut store = JsonlResultStore::open(&root).expect("open store");
    let record = store.start_run(&scenario("live")).unwrap();
    store.append_sample(&record, sample(0.0, 3.9)).unwrap();
    assert_eq!(store.samples(&record.run_id).len(), 1);
    assert_eq!(store.load_manifest(&record.run_id).unwrap().sample_count, 1);
    let _ = fs::remove_dir_all(root);
}

#[test]
fn matching_scenarios_share_a_fingerprint() {
    let mut store = InMemoryResultStore::new();
    let a = store.start_run(&scenario("same")).unwrap();
    let b = store.start_run(&scenario("same")).unwrap();
    let c = store.start_run(&scenario("other")).unwrap();
    assert_ne!(a.run_id, b.run_id);
    assert_eq!(a.fingerprint, b.fingerprint);
    assert_ne!(a.fingerprint, c.fingerprint);
    assert!(chrono::DateTime::parse_from_rfc3339(&a.started_at).is_ok());
}
