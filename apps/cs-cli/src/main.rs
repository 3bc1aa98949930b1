use clap::{Parser, Subcommand};
use cs_app::{
    AppError, AppResult, ExportHeader, Orchestrator, TsvExporter, load_drive_cycle_csv, merge_runs,
    query,
};
use cs_core::SignalSample;
use cs_models::{BatteryPackModel, SingleCellModel};
use cs_results::JsonlResultStore;
use cs_scenario::{CellDefinition, PRESET_IDS, Scenario, cell_preset, default_cell_presets};
use cs_sim::{EulerSolver, RunEvent, RunEventKind};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Parser)]
#[command(name = "cellsim")]
#[command(about = "Battery cell electro-thermal simulation over drive cycles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cell presets against a drive-cycle CSV and export one table
    Run {
        /// Drive-cycle CSV with time_s and speed_kph columns
        #[arg(long)]
        drive_cycle: PathBuf,
        /// Preset to simulate (repeatable, defaults to all presets)
        #[arg(long = "cell")]
        cells: Vec<String>,
        /// Ambient and initial cell temperature in degrees C
        #[arg(long, default_value_t = 25.0)]
        ambient: f64,
        /// Output TSV file
        #[arg(short, long, default_value = "cell_simulation_results.tsv")]
        output: PathBuf,
        /// Persist runs to this directory
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Run a scenario file (YAML or JSON)
    Scenario {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Output TSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Persist the run to this directory
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// List built-in cell presets
    Presets,
    /// List runs in a store
    Runs {
        /// Run store directory
        #[arg(long)]
        store: PathBuf,
    },
    /// Show details of a stored run
    ShowRun {
        /// Run store directory
        #[arg(long)]
        store: PathBuf,
        /// Run ID to display
        run_id: String,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            drive_cycle,
            cells,
            ambient,
            output,
            store,
        } => cmd_run(&drive_cycle, &cells, ambient, &output, store.as_deref()),
        Commands::Scenario {
            scenario_path,
            output,
            store,
        } => cmd_scenario(&scenario_path, output.as_deref(), store.as_deref()),
        Commands::Presets => cmd_presets(),
        Commands::Runs { store } => cmd_runs(&store),
        Commands::ShowRun { store, run_id } => cmd_show_run(&store, &run_id),
    }
}

fn build_orchestrator(store: Option<&Path>) -> AppResult<Orchestrator> {
    let mut orchestrator = Orchestrator::with_defaults();
    if let Some(dir) = store {
        orchestrator.set_result_store(Box::new(JsonlResultStore::open(dir)?));
    }
    orchestrator.register_solver(Box::new(EulerSolver::new()));

    let last_percent = AtomicUsize::new(usize::MAX);
    orchestrator.event_bus().subscribe(move |event| {
        render_cli_progress(event, &last_percent);
    });
    Ok(orchestrator)
}

fn resolve_cells(ids: &[String]) -> AppResult<Vec<CellDefinition>> {
    if ids.is_empty() {
        return Ok(default_cell_presets());
    }
    ids.iter()
        .map(|id| cell_preset(id).ok_or_else(|| AppError::UnknownPreset(id.clone())))
        .collect()
}

fn cmd_run(
    drive_cycle: &Path,
    cell_ids: &[String],
    ambient: f64,
    output: &Path,
    store: Option<&Path>,
) -> AppResult<()> {
    let cycle = load_drive_cycle_csv(drive_cycle)?;
    let cells = resolve_cells(cell_ids)?;
    println!(
        "Loaded drive cycle {} ({} samples, dt = {:.3} s)",
        cycle.id,
        cycle.samples.len(),
        cycle.sample_interval
    );

    let mut orchestrator = build_orchestrator(store)?;
    orchestrator.register_model(Box::new(SingleCellModel::matching_cell()));

    let mut runs = Vec::with_capacity(cells.len());
    for cell in &cells {
        let scenario = Scenario::for_cell(cycle.clone(), cell.clone(), ambient);
        println!("Simulating {} ({} model)", cell.cell_id, cell.model_kind);
        let record = orchestrator.run(&scenario)?;
        clear_progress_line();
        println!("✓ {} completed: {}", cell.cell_id, record.run_id);
        runs.push(orchestrator.samples(&record.run_id));
    }

    let table = merge_runs(&runs);
    let header = ExportHeader {
        drive_cycle_source: cycle.source.clone(),
        ambient_temperature_c: ambient,
        cells,
    };
    export_table(&mut orchestrator, header, output, &table)?;
    println!("Exported {} samples to {}", table.len(), output.display());
    Ok(())
}

fn cmd_scenario(
    scenario_path: &Path,
    output: Option<&Path>,
    store: Option<&Path>,
) -> AppResult<()> {
    let scenario = cs_scenario::load_path(scenario_path)?;
    println!("Running scenario: {}", scenario.id);

    let mut orchestrator = build_orchestrator(store)?;
    if scenario.active_cell().is_some() {
        orchestrator.register_model(Box::new(SingleCellModel::matching_cell()));
    } else {
        orchestrator.register_model(Box::new(BatteryPackModel::new()));
    }

    let record = orchestrator.run(&scenario)?;
    clear_progress_line();
    println!("✓ Simulation completed: {}", record.run_id);

    let samples = orchestrator.samples(&record.run_id);
    print_summary(&samples);

    if let Some(output) = output {
        export_table(
            &mut orchestrator,
            ExportHeader::from_scenario(&scenario),
            output,
            &samples,
        )?;
        println!("Exported {} samples to {}", samples.len(), output.display());
    }
    Ok(())
}

fn export_table(
    orchestrator: &mut Orchestrator,
    header: ExportHeader,
    output: &Path,
    samples: &[SignalSample],
) -> AppResult<()> {
    orchestrator
        .exporters_mut()
        .register(Box::new(TsvExporter::with_header(header)));
    let exporter = orchestrator
        .exporters()
        .find_by_format("tsv")
        .ok_or_else(|| AppError::InvalidInput("no tsv exporter registered".to_string()))?;
    exporter.export_to(output, samples)?;
    Ok(())
}

fn cmd_presets() -> AppResult<()> {
    println!("Cell presets:");
    for id in PRESET_IDS {
        if let Some(cell) = cell_preset(id) {
            println!(
                "  {:<8} {:<8} model={:<8} capacity={} Ah  R0={} ohm",
                cell.cell_id,
                cell.chemistry,
                cell.model_kind,
                cell.capacity_ah,
                cell.internal_resistance
            );
        }
    }
    Ok(())
}

fn cmd_runs(store_dir: &Path) -> AppResult<()> {
    let store = JsonlResultStore::open(store_dir)?;
    let manifests = store.list_manifests()?;

    if manifests.is_empty() {
        println!("No runs found in {}", store_dir.display());
    } else {
        println!("Runs in {}:", store_dir.display());
        for manifest in manifests {
            let status = if manifest.is_complete() {
                "complete"
            } else {
                "incomplete"
            };
            println!(
                "  {} {} ({} samples, {}, started {})",
                manifest.run_id,
                manifest.scenario_id,
                manifest.sample_count,
                status,
                manifest.started_at
            );
        }
    }
    Ok(())
}

fn cmd_show_run(store_dir: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let store = JsonlResultStore::open(store_dir)?;
    let manifest = store.load_manifest(run_id)?;
    let samples = store.load_samples(run_id)?;

    println!("\nRun Summary:");
    println!("  Scenario: {}", manifest.scenario_id);
    println!("  Fingerprint: {}", manifest.fingerprint);
    println!("  Started: {}", manifest.started_at);
    match &manifest.completed_at {
        Some(at) => println!("  Completed: {}", at),
        None => println!("  Completed: no"),
    }
    print_summary(&samples);

    println!("  Signals:");
    for name in query::list_signals(&samples) {
        if let Some(last) = samples.iter().rev().find_map(|s| s.get(&name)) {
            println!("    {:<32} final={:.4}", name, last);
        }
    }
    Ok(())
}

fn print_summary(samples: &[SignalSample]) {
    for line in summary_lines(samples) {
        println!("{line}");
    }
}

/// A run with zero steps is still a successful run.
fn summary_lines(samples: &[SignalSample]) -> Vec<String> {
    let Ok(summary) = query::run_summary(samples) else {
        return vec!["  No samples".to_string()];
    };
    vec![
        format!("  Time points: {}", summary.sample_count),
        format!("  Time range: {:.3} - {:.3} s", summary.time_range.0, summary.time_range.1),
        format!("  Signals: {}", summary.signal_count),
    ]
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(80));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunEvent, last_percent: &AtomicUsize) {
    match event.kind {
        RunEventKind::Progress => {
            let percent = (event.progress * 100.0).round() as usize;
            if last_percent.swap(percent, Ordering::Relaxed) == percent {
                return;
            }
            let width = 28usize;
            let filled = ((event.progress * width as f64).round() as usize).min(width);
            print!(
                "\r[{}{}] {:>3}%  t={:.1}s  {}",
                "#".repeat(filled),
                "-".repeat(width - filled),
                percent,
                event.timestamp,
                event.run_id
            );
            let _ = io::stdout().flush();
        }
        RunEventKind::Started => last_percent.store(usize::MAX, Ordering::Relaxed),
        RunEventKind::Failed => {
            clear_progress_line();
            eprintln!("✗ {} failed: {}", event.run_id, event.message);
        }
        RunEventKind::Completed => {}
    }
}
