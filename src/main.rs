use call_history::config::AppConfig;
use call_history::logging::init_tracing;
use call_history::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "call-history")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Call history cache and clear workflow", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cache records from a JSON file and print the resulting state
    Replay {
        /// JSON array of call history records
        records: PathBuf,

        /// Run the clear-all workflow after caching
        #[arg(long)]
        clear: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Replay { records, clear } => {
            call_history::cli::replay::run(&records, clear, &config).await?;
        }
    }

    Ok(())
}
