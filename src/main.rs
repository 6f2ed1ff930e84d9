//! Ensemble combiner CLI
//!
//! Reads a JSON `CombineRequest` from a file or stdin, runs one combination
//! policy and prints the consensus matrix as JSON rows on stdout.

use clap::{Parser, Subcommand, ValueEnum};
use ensemble_combiner::{
    config::Config, CombineMode, CombineRequest, CombineStrategy, DegeneratePolicy,
    EnsembleCombiner,
};
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "ensemble-combine")]
#[command(about = "Combine per-classifier probability matrices into one consensus matrix")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Request JSON file ("-" reads stdin)
    #[arg(short, long, default_value = "-", global = true)]
    input: String,

    /// Accumulation mode (overrides config)
    #[arg(long, value_enum, global = true)]
    mode: Option<ModeArg>,

    /// Check shapes and lengths before combining
    #[arg(long, global = true)]
    validate: bool,

    /// Zero certainty mass handling (overrides config)
    #[arg(long, value_enum, global = true)]
    degenerate: Option<DegenerateArg>,

    /// Pretty-print the output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Unweighted average
    Average,
    /// Fixed per-classifier weights (request needs "weights")
    Weighted,
    /// Per-sample uncertainty weights (request needs "uncertainties")
    Uncertainty,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Legacy,
    Corrected,
}

#[derive(Clone, Copy, ValueEnum)]
enum DegenerateArg {
    Propagate,
    Uniform,
    Error,
}

impl From<ModeArg> for CombineMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Legacy => CombineMode::Legacy,
            ModeArg::Corrected => CombineMode::Corrected,
        }
    }
}

impl From<DegenerateArg> for DegeneratePolicy {
    fn from(arg: DegenerateArg) -> Self {
        match arg {
            DegenerateArg::Propagate => DegeneratePolicy::Propagate,
            DegenerateArg::Uniform => DegeneratePolicy::Uniform,
            DegenerateArg::Error => DegeneratePolicy::Error,
        }
    }
}

impl From<&Commands> for CombineStrategy {
    fn from(command: &Commands) -> Self {
        match command {
            Commands::Average => CombineStrategy::Average,
            Commands::Weighted => CombineStrategy::Weighted,
            Commands::Uncertainty => CombineStrategy::Uncertainty,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;

    // Logs go to stderr, stdout carries the JSON result
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Some(mode) = cli.mode {
        config.combiner.mode = mode.into();
    }
    if let Some(degenerate) = cli.degenerate {
        config.combiner.degenerate = degenerate.into();
    }
    if cli.validate {
        config.combiner.validate_inputs = true;
    }

    let request = read_request(&cli.input)?;
    let strategy = CombineStrategy::from(&cli.command);
    tracing::info!(
        "Combining {} classifiers with {:?} ({:?} mode)",
        request.n_classifiers(),
        strategy,
        config.combiner.mode
    );

    let combiner = EnsembleCombiner::new(config.combiner);
    let consensus = combiner.combine(strategy, &request)?;

    if !consensus.is_finite() {
        tracing::warn!("Consensus matrix contains NaN or infinite values");
    }

    let output = if cli.pretty {
        serde_json::to_string_pretty(&consensus)?
    } else {
        serde_json::to_string(&consensus)?
    };
    println!("{}", output);

    Ok(())
}

fn read_request(input: &str) -> anyhow::Result<CombineRequest> {
    let json = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        let path = shellexpand::tilde(input).to_string();
        std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read request {}: {}", path, e))?
    };

    Ok(CombineRequest::from_json(&json)?)
}
