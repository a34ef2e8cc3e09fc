use clap::Subcommand;
use zavod_core::AppConfig;
use zavod_fetch::{ReferenceFetcher, ReferenceSource};

#[derive(Debug, Subcommand)]
pub enum FetchCommands {
    /// Search for references and print them
    Refs {
        /// Maximum number of references to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

pub(crate) async fn run(config: &AppConfig, command: FetchCommands) -> anyhow::Result<()> {
    match command {
        FetchCommands::Refs { limit } => {
            let fetcher = ReferenceFetcher::from_config(config)?;
            let options = fetcher.options();
            tracing::info!(
                env = %config.env,
                max_queries = options.max_queries,
                max_results_per_query = options.max_results_per_query,
                skip_recency_filter = options.skip_recency_filter,
                "fetching references"
            );

            let references = fetcher.fetch_all().await?;
            println!("found {} references", references.len());
            for (n, reference) in references.iter().take(limit).enumerate() {
                println!(
                    "{:>3}. {} | {} | views={} engagement={:.3} | {}",
                    n + 1,
                    reference.published_at.format("%Y-%m-%d"),
                    reference.title,
                    reference.metrics.views,
                    reference.metrics.engagement_rate(),
                    reference.url
                );
            }
        }
    }
    Ok(())
}
