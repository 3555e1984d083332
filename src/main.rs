//! heatsim entry point: CLI wiring and scenario-driven runs.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser};
use tracing::Level;

use heatsim::config::ScenarioConfig;
use heatsim::devices::SystemKind;
use heatsim::io::export::export_csv;
use heatsim::sim::compare::compare_systems;
use heatsim::sim::engine::Solver;
use heatsim::sim::kpi::KpiReport;
use heatsim::sim::supply_path::SupplyPath;

/// Simulates one day of space heating and hot water for a single dwelling.
#[derive(Parser, Debug)]
#[command(name = "heatsim", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    source: ScenarioSource,

    /// Override the scenario's supply path (e.g. hot_water_system, cold, mixed, electric)
    #[arg(long)]
    supply_path: Option<SupplyPath>,

    /// Export per-step records to CSV
    #[arg(long, value_name = "PATH")]
    telemetry_out: Option<PathBuf>,

    /// Run the scenario's building against several systems, e.g. combi,heat_pump,stored
    #[arg(long, value_delimiter = ',', value_name = "KINDS")]
    compare: Vec<SystemKind>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Start the REST API server after the run
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = false)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct ScenarioSource {
    /// Load scenario from a TOML file
    #[arg(long, value_name = "PATH")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, heat_pump, stored_tight)
    #[arg(long)]
    preset: Option<String>,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scenario(source: &ScenarioSource) -> ScenarioConfig {
    let loaded = if let Some(ref path) = source.scenario {
        ScenarioConfig::from_toml_file(path)
    } else if let Some(ref name) = source.preset {
        ScenarioConfig::from_preset(name)
    } else {
        Ok(ScenarioConfig::baseline())
    };

    loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    })
}

fn run_comparison(scenario: &ScenarioConfig, kinds: &[SystemKind]) {
    let results = compare_systems(
        &scenario.building,
        kinds,
        &scenario.system.context(),
        &scenario.draws,
        scenario.supply_path,
        &scenario.occupancy,
    );

    println!(
        "{:<10} {:>8} {:>10} {:>10} {:>8} {:>8} {:>10}",
        "system", "max kW", "out kWh", "in kWh", "eff", "cycles", "unmet kWh"
    );
    for c in &results {
        println!(
            "{:<10} {:>8.2} {:>10.2} {:>10.2} {:>8.3} {:>8} {:>10.2}",
            c.kind.as_str(),
            c.system.max_kw,
            c.kpi.delivered_kwh,
            c.kpi.input_kwh,
            c.kpi.seasonal_efficiency,
            c.kpi.cycling_steps,
            c.kpi.unmet_dhw_kwh,
        );
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut scenario = load_scenario(&cli.source);
    if let Some(path) = cli.supply_path {
        scenario.supply_path = path;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    if !cli.compare.is_empty() {
        run_comparison(&scenario, &cli.compare);
        return;
    }

    let input = scenario.to_solver_input();
    let timeline = Solver::new(input.clone()).run();
    let kpi = KpiReport::from_timeline(&timeline, &input.system);

    for r in timeline.records() {
        println!("{r}");
    }
    println!("\n{kpi}");

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&timeline, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(heatsim::api::AppState {
            scenario,
            kpi,
            timeline,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(heatsim::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
