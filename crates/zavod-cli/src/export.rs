//! Export commands for stored runs: Blotato payloads and Markdown briefs.

use std::path::PathBuf;

use clap::Subcommand;
use zavod_core::{AppConfig, PersistedRun};
use zavod_export::{run_to_markdown, to_blotato_payload, BlotatoClient};
use zavod_store::{JsonlRunStore, RunRepository};

#[derive(Debug, Subcommand)]
pub enum ExportCommands {
    /// Build the Blotato render request for a run
    Payload {
        /// Run to export (defaults to the latest)
        #[arg(long)]
        run_id: Option<String>,
        /// Submit the request instead of printing it
        #[arg(long)]
        send: bool,
    },
    /// Render a run as Markdown
    Markdown {
        /// Run to export (defaults to the latest)
        #[arg(long)]
        run_id: Option<String>,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub(crate) async fn run(config: &AppConfig, command: ExportCommands) -> anyhow::Result<()> {
    let store = JsonlRunStore::new(config.runs_path());
    match command {
        ExportCommands::Payload { run_id, send } => {
            let run = select_run(&store, run_id.as_deref())?;
            let brand = zavod_core::resolve_brand_profile(config.brand_profile_path.as_deref())?;
            let payload = to_blotato_payload(&run.carousel, &run.analyzed, &brand);

            if send {
                let client = BlotatoClient::from_config(config)?.with_dry_run(false);
                let response = client.create_video_from_template(&payload).await?;
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&payload.to_request_body())?
                );
            }
        }
        ExportCommands::Markdown { run_id, output } => {
            let run = select_run(&store, run_id.as_deref())?;
            let markdown = run_to_markdown(&run);
            match output {
                Some(path) => {
                    std::fs::write(&path, markdown)?;
                    println!("wrote {}", path.display());
                }
                None => println!("{markdown}"),
            }
        }
    }
    Ok(())
}

fn select_run(store: &JsonlRunStore, run_id: Option<&str>) -> anyhow::Result<PersistedRun> {
    let run = match run_id {
        Some(id) => store.find(id)?,
        None => store.latest()?,
    };
    run.ok_or_else(|| match run_id {
        Some(id) => anyhow::anyhow!("run {id} not found"),
        None => anyhow::anyhow!("no runs stored yet"),
    })
}
