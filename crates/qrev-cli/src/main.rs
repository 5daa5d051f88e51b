//! qrev Command-Line Interface
//!
//! Replays compiled reversible circuits on classical bits and prints the
//! final state and decoded registers.
//!
//! ```text
//! qrev run -i adder.json -l layout.yaml
//! qrev inspect -i adder.json -l layout.yaml -f json
//! qrev gates
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{gates, inspect, run, version};
use config::{Config, OutputFormat};

/// qrev - classical replay of reversible quantum circuits
#[derive(Parser)]
#[command(name = "qrev")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(long, global = true, env = "QREV_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a circuit and print the final state and registers
    Run {
        /// Input circuit (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Register layout (YAML or JSON list of register descriptors)
        #[arg(short, long)]
        layout: Option<String>,

        /// Output format [default: from config, else table]
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Only print these registers (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        registers: Vec<String>,

        /// Print every applied gate
        #[arg(long)]
        history: bool,
    },

    /// Replay a circuit and print an inspection report
    Inspect {
        /// Input circuit (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Register layout (YAML or JSON list of register descriptors)
        #[arg(short, long)]
        layout: Option<String>,

        /// Output format [default: from config, else table]
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List gate names the simulator can replay
    Gates,

    /// Show version information
    Version,
}

fn log_filter(verbose: u8, config: &Config) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env("QREV_LOG") {
        return filter;
    }
    let level = match verbose {
        0 => config.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, &config))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Run {
            input,
            layout,
            format,
            registers,
            history,
        } => run::execute(
            &input,
            layout.as_deref(),
            format.unwrap_or(config.output.format),
            &registers,
            history || config.output.show_history,
        ),

        Commands::Inspect {
            input,
            layout,
            format,
        } => inspect::execute(
            &input,
            layout.as_deref(),
            format.unwrap_or(config.output.format),
        ),

        Commands::Gates => {
            gates::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
