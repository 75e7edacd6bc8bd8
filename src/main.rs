//! Simulator entry point — CLI wiring and config-driven engine construction.

use std::path::{Path, PathBuf};
use std::process;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use homegrid_sim::config::ScenarioConfig;
use homegrid_sim::io::export::export_csv;
use homegrid_sim::market::PriceTable;
use homegrid_sim::sim::engine::Engine;
use homegrid_sim::sim::summary::SummaryReport;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    hours_override: Option<u64>,
    price_data: Option<PathBuf>,
    telemetry_out: Option<String>,
    quiet: bool,
}

fn print_help() {
    eprintln!("homegrid-sim — hourly household energy economy simulator");
    eprintln!();
    eprintln!("Usage: homegrid-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, auto_trader, heavy_load)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --hours <u64>            Override simulated hours");
    eprintln!("  --price-data <path>      Yearly price CSV (Month,Day,Hour,SMP)");
    eprintln!("  --telemetry-out <path>   Export tick records to CSV");
    eprintln!("  --quiet                  Suppress per-tick output");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        hours_override: None,
        price_data: None,
        telemetry_out: None,
        quiet: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--hours" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --hours requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(h) = args[i].parse::<u64>() {
                    cli.hours_override = Some(h);
                } else {
                    eprintln!("error: --hours value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--price-data" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --price-data requires a path argument");
                    process::exit(1);
                }
                cli.price_data = Some(PathBuf::from(&args[i]));
            }
            "--telemetry-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --telemetry-out requires a path argument");
                    process::exit(1);
                }
                cli.telemetry_out = Some(args[i].clone());
            }
            "--quiet" => {
                cli.quiet = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Loads the price table named by the CLI or scenario, tolerating failure.
///
/// A missing or malformed table is non-fatal: the simulation runs on the
/// feed's fallback behavior instead.
fn load_price_table(cli: &CliArgs, cfg: &ScenarioConfig) -> Option<PriceTable> {
    let path = cli
        .price_data
        .clone()
        .or_else(|| cfg.market.data_path.clone())?;

    match PriceTable::from_csv_path(&path, cfg.market.conversion_factor) {
        Ok(table) => Some(table),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "price table unavailable, using fallback prices");
            None
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Apply overrides
    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(hours) = cli.hours_override {
        scenario.simulation.hours = hours;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Build and run
    let table = load_price_table(&cli, &scenario);
    let mut engine = Engine::from_config(&scenario, table);
    let results = engine.run(scenario.simulation.hours);

    // Print per-tick results
    if !cli.quiet {
        for r in &results {
            println!("{r}");
        }
    }

    // Print run summary
    println!(
        "\n{}",
        SummaryReport::from_results(&results, engine.battery().capacity_kwh())
    );

    // Export CSV if requested
    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&results, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }
}
