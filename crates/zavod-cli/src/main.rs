mod export;
mod fetch;
mod pipeline;
mod task;
mod worker;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::export::ExportCommands;
use crate::fetch::FetchCommands;
use crate::pipeline::PipelineCommands;
use crate::task::TaskCommands;
use crate::worker::WorkerCommands;

#[derive(Debug, Parser)]
#[command(name = "zavod-cli")]
#[command(about = "Wildberries carousel pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage the generation task queue
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Run the queue worker
    Worker {
        #[command(subcommand)]
        command: WorkerCommands,
    },
    /// Query the reference search backend
    Fetch {
        #[command(subcommand)]
        command: FetchCommands,
    },
    /// Run the batch pipeline without the queue
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
    /// Export a stored run
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("zavod-cli: no command given, see --help");
        return Ok(());
    };

    let config = zavod_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Task { command } => task::run(&config, command),
        Commands::Worker { command } => worker::run(&config, command).await,
        Commands::Fetch { command } => fetch::run(&config, command).await,
        Commands::Pipeline { command } => pipeline::run(&config, command).await,
        Commands::Export { command } => export::run(&config, command).await,
    }
}
