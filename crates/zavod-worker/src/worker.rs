//! Task orchestration: one pending task through lookup, analysis,
//! generation and persistence.

use zavod_core::{GenerationTask, PersistedRun, Reference};
use zavod_fetch::ReferenceSource;
use zavod_llm::CompletionClient;
use zavod_store::{RunRepository, TaskRepository};

use crate::error::WorkerError;

/// Drives tasks from the queue to persisted runs.
///
/// With no completion client the analysis and carousel stages use their
/// deterministic placeholders.
pub struct Worker<T, R, S, C> {
    tasks: T,
    runs: R,
    source: S,
    llm: Option<C>,
}

impl<T, R, S, C> Worker<T, R, S, C>
where
    T: TaskRepository,
    R: RunRepository,
    S: ReferenceSource,
    C: CompletionClient,
{
    #[must_use]
    pub fn new(tasks: T, runs: R, source: S, llm: Option<C>) -> Self {
        Self {
            tasks,
            runs,
            source,
            llm,
        }
    }

    #[must_use]
    pub fn tasks(&self) -> &T {
        &self.tasks
    }

    #[must_use]
    pub fn runs(&self) -> &R {
        &self.runs
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn llm_enabled(&self) -> bool {
        self.llm.is_some()
    }

    /// Process the oldest pending task, if any.
    ///
    /// The task is persisted as `in_progress` before any external call. On
    /// failure it is persisted as `failed` with the error text and the error
    /// is returned. A store error while recording the failure is logged and
    /// the pipeline error is still the one returned.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError`] when the queue cannot be read or written, or
    /// when any pipeline stage fails for the task.
    pub async fn process_one_pending(&self) -> Result<Option<GenerationTask>, WorkerError> {
        let Some(mut task) = self.tasks.fetch_next_pending()? else {
            tracing::debug!("no pending tasks");
            return Ok(None);
        };

        task.start();
        let mut task = self.tasks.update(task)?;
        tracing::info!(task_id = %task.id, url = %task.source_url, "processing task");

        match self.run_task(&task).await {
            Ok(run) => {
                task.complete(run.id);
                let task = self.tasks.update(task)?;
                tracing::info!(task_id = %task.id, run_id = ?task.run_id, "task done");
                Ok(Some(task))
            }
            Err(e) => {
                tracing::error!(task_id = %task.id, error = %e, "task failed");
                let task_id = task.id.clone();
                task.fail(e.to_string());
                if let Err(store_err) = self.tasks.update(task) {
                    tracing::error!(task_id = %task_id, error = %store_err, "could not persist failed status");
                }
                Err(e)
            }
        }
    }

    async fn run_task(&self, task: &GenerationTask) -> Result<PersistedRun, WorkerError> {
        let reference = self
            .source
            .fetch_one(&task.source_url)
            .await?
            .ok_or_else(|| WorkerError::ReferenceNotFound(task.source_url.clone()))?;
        let run = self.build_run(reference).await?;
        self.runs.append(&run)?;
        Ok(run)
    }

    /// Fetch references and persist a run for each of the first
    /// `max_analyses`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError`] on the first fetch, LLM or store failure;
    /// runs persisted before the failure stay persisted.
    pub async fn run_pipeline(&self, max_analyses: usize) -> Result<Vec<PersistedRun>, WorkerError> {
        let references = self.source.fetch_all().await?;
        tracing::info!(
            found = references.len(),
            max_analyses,
            llm_enabled = self.llm_enabled(),
            "references fetched"
        );

        let mut runs = Vec::new();
        for reference in references.into_iter().take(max_analyses) {
            let run = self.build_run(reference).await?;
            self.runs.append(&run)?;
            runs.push(run);
        }
        Ok(runs)
    }

    async fn build_run(&self, reference: Reference) -> Result<PersistedRun, WorkerError> {
        let (analyzed, carousel) = match &self.llm {
            Some(client) => {
                let analyzed = zavod_llm::analyze(&reference, client).await?;
                let carousel = zavod_llm::generate(&analyzed, client).await?;
                (analyzed, carousel)
            }
            None => {
                let analyzed = zavod_llm::dummy_analysis(&reference);
                let carousel = zavod_llm::dummy_carousel(&analyzed);
                (analyzed, carousel)
            }
        };
        Ok(PersistedRun::new(reference, analyzed, carousel))
    }
}
