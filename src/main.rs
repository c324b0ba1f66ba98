use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use pov_score::location::LocationRecord;
use pov_score::output::{self, OutputFormat};
use pov_score::scoring::{self, ActiveSelection, CompositeResult, Registry, ScoringConfig};

const EXIT_SUCCESS: i32 = 0;
const EXIT_OUTPUT: i32 = 1;
const EXIT_CONFIG: i32 = 4;
const EXIT_DATA: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one location with contributors, narrative and sensitivity
    Score {
        /// JSON file holding the location (the first record is used)
        file: PathBuf,
        /// Skip contributors, narratives and counterfactual simulation
        #[arg(long)]
        no_explain: bool,
        /// Counterfactual perturbation in raw points
        #[arg(long)]
        delta: Option<f64>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Score every location, preserving input order
    Batch {
        /// JSON files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Score every location and list the worst first
    Rank {
        /// JSON files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,
        /// Show at most this many locations
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// List the indicator registry
    Indicators,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Comma-separated active indicators (defaults to the config file, then all)
    #[arg(short, long, value_parser = parse_active)]
    active: Option<ActiveSelection>,
    /// Output format (defaults to the config file, then table)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
    /// Also write the JSON results to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(name = "pov-score")]
#[command(about = "Composite poverty scoring with explanations", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pov-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_active(raw: &str) -> Result<ActiveSelection, String> {
    ActiveSelection::parse_list(raw).map_err(|err| err.to_string())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = pov_score::telemetry::init(cli.verbose) {
        eprintln!("Logging setup failed: {}", e);
    }

    let start_time = Instant::now();
    let registry = Registry::standard();

    let config_path = cli.config.map(PathBuf::from);
    let config = match pov_score::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let mut effective_scoring = config.effective_scoring();
    if let Commands::Score {
        delta: Some(delta), ..
    } = &cli.command
    {
        effective_scoring.counterfactual_delta = Some(*delta);
    }

    // Validate scoring config (after CLI overrides) at startup
    if let Err(errors) = scoring::validate_scoring(&effective_scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let use_colors = output::should_use_colors();

    match cli.command {
        Commands::Indicators => {
            println!("{}", output::format_registry(registry, use_colors));
        }
        Commands::Score {
            file,
            no_explain,
            common,
            ..
        } => {
            let location = match pov_score::location::load_locations(&file) {
                Ok(mut locations) if !locations.is_empty() => locations.swap_remove(0),
                Ok(_) => {
                    eprintln!("No location records in {}", file.display());
                    std::process::exit(EXIT_DATA);
                }
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_DATA);
                }
            };

            let active = active_selection(&common, &effective_scoring, registry);
            let options = effective_scoring.score_options(!no_explain);
            let result = scoring::score_location(registry, &location, &active, &options);
            report_diagnostics(std::slice::from_ref(&result));

            let format = common.format.unwrap_or_else(|| config.output_format());
            let rendered = match format {
                OutputFormat::Table => Ok(output::format_detail(registry, &result, use_colors)),
                OutputFormat::Tsv => Ok(output::format_tsv(std::slice::from_ref(&result))),
                OutputFormat::Json => output::format_json(&result),
            };
            print_or_exit(rendered);
            write_output(common.output.as_deref(), &result);
        }
        Commands::Batch { inputs, common } => {
            let locations = load_inputs(&inputs);
            let active = active_selection(&common, &effective_scoring, registry);
            let results = scoring::score_batch(registry, &locations, &active);
            report_diagnostics(&results);

            let format = common.format.unwrap_or_else(|| config.output_format());
            print_or_exit(render_list(&results, format, use_colors));
            write_output(common.output.as_deref(), &results);
        }
        Commands::Rank {
            inputs,
            limit,
            common,
        } => {
            let locations = load_inputs(&inputs);
            let active = active_selection(&common, &effective_scoring, registry);
            let mut results = scoring::rank_locations(registry, &locations, &active);
            report_diagnostics(&results);
            if let Some(limit) = limit {
                results.truncate(limit);
            }

            let format = common.format.unwrap_or_else(|| config.output_format());
            print_or_exit(render_list(&results, format, use_colors));
            write_output(common.output.as_deref(), &results);
        }
    }

    tracing::debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

/// CLI flag first, then the config file, then every indicator
fn active_selection(
    common: &CommonArgs,
    scoring: &ScoringConfig,
    registry: &Registry,
) -> ActiveSelection {
    match &common.active {
        Some(active) => active.clone(),
        None => scoring.active_selection(registry),
    }
}

fn load_inputs(inputs: &[String]) -> Vec<LocationRecord> {
    match pov_score::location::load_many(inputs) {
        Ok(locations) => {
            tracing::debug!(count = locations.len(), "locations loaded");
            locations
        }
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    }
}

fn report_diagnostics(results: &[CompositeResult]) {
    let reported = scoring::report_diagnostics(results.iter().flat_map(|r| &r.diagnostics));
    tracing::debug!(reported, "diagnostics reported");
}

fn render_list(
    results: &[CompositeResult],
    format: OutputFormat,
    use_colors: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(output::format_scored_table(results, use_colors)),
        OutputFormat::Tsv => Ok(output::format_tsv(results)),
        OutputFormat::Json => output::format_json(results),
    }
}

fn print_or_exit(rendered: anyhow::Result<String>) {
    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Output error: {:#}", e);
            std::process::exit(EXIT_OUTPUT);
        }
    }
}

fn write_output<T: serde::Serialize + ?Sized>(path: Option<&std::path::Path>, value: &T) {
    if let Some(path) = path {
        if let Err(e) = output::write_json_atomic(path, value) {
            eprintln!("Output error: {:#}", e);
            std::process::exit(EXIT_OUTPUT);
        }
    }
}
