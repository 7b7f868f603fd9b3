use llm_bench_core::{BenchError, EvaluationReport, Result, RunMetadata, Task, TextGenerator};
use llm_bench_metrics::evaluators::Evaluator;
use llm_bench_storage::{ArtifactRecord, ArtifactRepository};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::judges::Judge;
use crate::runner::Runner;

/// Latency subset size used by pipeline runs.
pub const PIPELINE_MEASURE_K: usize = 25;

/// Everything one pipeline execution leaves behind.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub metadata: RunMetadata,
    pub report: EvaluationReport,
    pub run_dir: PathBuf,
    pub results: ArtifactRecord,
    pub judged: ArtifactRecord,
    pub evaluation: ArtifactRecord,
}

/// Runner, judge and evaluator for one task, strictly in that order.
///
/// Each run writes into its own `runs/<run_id>/` directory below the output
/// root. Any stage failure aborts the execution with its error kind unchanged.
#[derive(Debug, Clone)]
pub struct BenchmarkPipeline {
    output_root: PathBuf,
    measure_k: usize,
    timeout: Option<Duration>,
}

impl BenchmarkPipeline {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            measure_k: PIPELINE_MEASURE_K,
            timeout: None,
        }
    }

    pub fn with_measure_k(mut self, measure_k: usize) -> Self {
        self.measure_k = measure_k;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// The evaluator must read the scoring column the judge writes.
    pub fn check_compatibility(judge: &dyn Judge, evaluator: &dyn Evaluator) -> Result<()> {
        let produced = judge.column();
        let required = evaluator.kind().required_column();
        if produced != required {
            return Err(BenchError::Configuration(format!(
                "Evaluator '{}' needs a '{}' column but judge '{}' produces '{}'",
                evaluator.kind(),
                required,
                judge.kind(),
                produced
            )));
        }
        Ok(())
    }

    pub async fn execute(
        &self,
        task: &Task,
        model: Arc<dyn TextGenerator>,
        judge: &dyn Judge,
        evaluator: &dyn Evaluator,
    ) -> Result<PipelineOutput> {
        Self::check_compatibility(judge, evaluator)?;

        tracing::info!(
            "Pipeline start: task_id={}, judge={}, evaluator={}, output_root={}",
            task.id(),
            judge.kind(),
            evaluator.kind(),
            self.output_root.display()
        );

        let runner = Runner::new(model)
            .with_measure_k(self.measure_k)
            .with_timeout(self.timeout);
        let (metadata, table) = runner.run(task).await?;

        let repository = ArtifactRepository::create(&self.output_root, &metadata.run_id)?;
        let results = repository.save_results(&table)?;

        let judged = judge
            .check_answers(metadata, table, &repository.judged_path())
            .await?;
        let (report, evaluation) =
            evaluator.compute(judged.metadata.clone(), &judged.table, &repository.report_path())?;

        tracing::info!(
            "Pipeline complete: run_id={}, dir={}",
            judged.metadata.run_id,
            repository.dir().display()
        );

        Ok(PipelineOutput {
            metadata: judged.metadata,
            report,
            run_dir: repository.dir().to_path_buf(),
            results,
            judged: judged.artifact,
            evaluation,
        })
    }
}
