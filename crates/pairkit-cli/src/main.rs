use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pairkit_core::demo::demo_spec;
use pairkit_core::export::render_table;
use pairkit_core::{run_file, run_spec, ConfigOverrides, Outcome};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pairkit", about = "Pairwise combination generator")]
#[command(version)]
struct Cli {
    /// Log filter, used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate rows from a YAML or JSON spec
    Gen(GenArgs),

    /// Run the built-in Browser × OS × Auth example
    Demo(BudgetArgs),
}

#[derive(Args)]
struct GenArgs {
    /// Spec file (.yml, .yaml or .json)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file; .json writes JSON, anything else CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the table even when writing a file
    #[arg(long)]
    show: bool,

    #[command(flatten)]
    budget: BudgetArgs,
}

#[derive(Args)]
struct BudgetArgs {
    /// Lower bound on greedy attempts
    #[arg(long, env = "PAIRKIT_MIN_ATTEMPTS")]
    min_attempts: Option<usize>,

    /// Greedy attempts granted per target pair
    #[arg(long)]
    attempts_per_target: Option<usize>,

    /// Largest cross-product the exhaustive fallback may walk
    #[arg(long, env = "PAIRKIT_MAX_EXHAUSTIVE", conflicts_with = "no_exhaustive_limit")]
    max_exhaustive: Option<u64>,

    /// Let the exhaustive fallback walk any cross-product size
    #[arg(long)]
    no_exhaustive_limit: bool,
}

impl BudgetArgs {
    fn overrides(&self) -> ConfigOverrides {
        let max_exhaustive_combinations = if self.no_exhaustive_limit {
            Some(None)
        } else {
            self.max_exhaustive.map(Some)
        };
        ConfigOverrides {
            min_attempts: self.min_attempts,
            attempts_per_target: self.attempts_per_target,
            max_exhaustive_combinations,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match cli.command {
        Commands::Gen(args) => gen(args),
        Commands::Demo(budget) => {
            let outcome = run_spec(demo_spec(), &budget.overrides())?;
            print!("{}", render_table(&outcome.spec.parameters, &outcome.rows));
            println!("{}", outcome.summary);
            Ok(())
        }
    }
}

fn gen(args: GenArgs) -> anyhow::Result<()> {
    let outcome: Outcome = run_file(&args.input, &args.budget.overrides())
        .with_context(|| format!("generating from {}", args.input.display()))?;

    if let Some(path) = &args.output {
        outcome
            .write(path)
            .with_context(|| format!("saving rows to {}", path.display()))?;
        println!("Saved {} rows -> {}", outcome.rows.len(), path.display());
    }
    if args.show || args.output.is_none() {
        print!("{}", render_table(&outcome.spec.parameters, &outcome.rows));
    }
    println!("{}", outcome.summary);
    Ok(())
}
