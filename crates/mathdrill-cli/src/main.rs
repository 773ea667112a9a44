//! mathdrill CLI: timed arithmetic practice on the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "mathdrill", version, about = "Timed arithmetic practice quiz")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a timed game
    Play {
        /// Settings file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Game length in seconds
        #[arg(long)]
        duration: Option<u32>,

        /// Target score to pace against (0 disables pacing)
        #[arg(long)]
        target: Option<u32>,

        /// Enabled operations (comma-separated: add,sub,mul,div)
        #[arg(long)]
        ops: Option<String>,

        /// Enable decimal division rounded to this many places
        #[arg(long)]
        decimals: Option<u32>,

        /// Enable fraction mode with this maximum denominator
        #[arg(long)]
        fractions: Option<i64>,

        /// Seed for reproducible problems
        #[arg(long)]
        seed: Option<u64>,

        /// Directory to save the session report into
        #[arg(long)]
        save_report: Option<PathBuf>,
    },

    /// Validate a settings file
    Validate {
        /// Path to the settings file
        #[arg(long)]
        config: PathBuf,
    },

    /// Render a saved session report
    Report {
        /// Report JSON file
        #[arg(long)]
        file: PathBuf,

        /// Sort key: sequence, time, category, attempts
        #[arg(long, default_value = "sequence")]
        sort: String,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create a starter mathdrill.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mathdrill=warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            config,
            duration,
            target,
            ops,
            decimals,
            fractions,
            seed,
            save_report,
        } => {
            let overrides = commands::play::Overrides {
                duration,
                target,
                ops,
                decimals,
                fractions,
            };
            commands::play::execute(config, overrides, seed, save_report).await
        }
        Commands::Validate { config } => commands::validate::execute(config),
        Commands::Report {
            file,
            sort,
            desc,
            format,
        } => commands::report::execute(file, sort, desc, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
