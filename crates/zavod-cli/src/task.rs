//! Task queue commands. These only touch `tasks.jsonl`.

use clap::Subcommand;
use zavod_core::{AppConfig, GenerationTask, Platform, TaskStatus};
use zavod_store::{JsonlTaskQueue, TaskRepository};

#[derive(Debug, Subcommand)]
pub enum TaskCommands {
    /// Queue a URL for carousel generation
    Create {
        url: String,
        #[arg(long, default_value = "youtube")]
        platform: Platform,
    },
    /// List queued tasks
    List {
        /// Only show tasks in this status (pending, in_progress, done, failed)
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Show one task as JSON
    Show { id: String },
}

pub(crate) fn run(config: &AppConfig, command: TaskCommands) -> anyhow::Result<()> {
    let queue = JsonlTaskQueue::new(config.tasks_path());
    match command {
        TaskCommands::Create { url, platform } => {
            let url = url.trim();
            anyhow::ensure!(!url.is_empty(), "task URL must not be empty");
            let task = GenerationTask::new(url, platform);
            queue.add(&task)?;
            println!("created task {} for {}", task.id, task.source_url);
        }
        TaskCommands::List { status } => {
            let tasks = queue.list(status)?;
            if tasks.is_empty() {
                println!("no tasks");
            }
            for task in &tasks {
                println!("{}", format_task_line(task));
            }
        }
        TaskCommands::Show { id } => {
            let task = queue
                .get(&id)?
                .ok_or_else(|| anyhow::anyhow!("task {id} not found"))?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
    }
    Ok(())
}

pub(crate) fn format_task_line(task: &GenerationTask) -> String {
    let mut line = format!(
        "{}  {:<11}  {}  {}",
        task.id,
        task.status,
        task.updated_at.format("%Y-%m-%d %H:%M:%S"),
        task.source_url
    );
    if let Some(run_id) = &task.run_id {
        line.push_str(&format!("  run={run_id}"));
    }
    if let Some(error) = &task.error {
        line.push_str(&format!("  error={error}"));
    }
    line
}
