use clap::Subcommand;
use zavod_core::AppConfig;

#[derive(Debug, Subcommand)]
pub enum PipelineCommands {
    /// Fetch references, then analyze and generate carousels for the first few
    Run {
        /// Use placeholder analysis and carousels instead of the LLM
        #[arg(long)]
        dry_run: bool,
    },
}

pub(crate) async fn run(config: &AppConfig, command: PipelineCommands) -> anyhow::Result<()> {
    match command {
        PipelineCommands::Run { dry_run } => {
            let mut config = config.clone();
            if dry_run {
                config.llm_enabled = false;
            }
            let worker = zavod_worker::default_worker(&config, &config.data_dir)?;
            let runs = worker.run_pipeline(config.llm_max_analyses_per_run).await?;

            if runs.is_empty() {
                println!("no references found");
            }
            for run in &runs {
                println!(
                    "run {}: {} slides, \"{}\" <- {}",
                    run.id,
                    run.carousel.slides.len(),
                    run.carousel.main_angle,
                    run.reference.url
                );
            }
            println!(
                "saved {} run(s) to {}",
                runs.len(),
                config.runs_path().display()
            );
        }
    }
    Ok(())
}
