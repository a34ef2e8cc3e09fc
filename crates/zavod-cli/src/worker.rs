use clap::Subcommand;
use zavod_core::AppConfig;

#[derive(Debug, Subcommand)]
pub enum WorkerCommands {
    /// Process the oldest pending task and exit
    RunOnce,
}

pub(crate) async fn run(config: &AppConfig, command: WorkerCommands) -> anyhow::Result<()> {
    match command {
        WorkerCommands::RunOnce => {
            let worker = zavod_worker::default_worker(config, &config.data_dir)?;
            match worker.process_one_pending().await? {
                Some(task) => println!(
                    "processed task {} ({}), run {}",
                    task.id,
                    task.status,
                    task.run_id.as_deref().unwrap_or("-")
                ),
                None => println!("no pending tasks"),
            }
        }
    }
    Ok(())
}
