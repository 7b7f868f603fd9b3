use chrono::Utc;
use llm_bench_core::{
    BenchError, GenerationRequest, ModelIdentity, Result, ResultRow, ResultTable, RunId,
    RunMetadata, Task, TextGenerator,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::prompt::{build_prompt, DEFAULT_SYSTEM_PROMPT};
use crate::sampler::sample_rows;

pub const DEFAULT_MEASURE_K: usize = 5;

/// Calls `model` once and rejects blank output.
pub async fn generate_text(model: &dyn TextGenerator, request: GenerationRequest) -> Result<String> {
    let text = model.generate(request).await?;
    if text.trim().is_empty() {
        return Err(BenchError::Model(format!(
            "Model '{}' returned an empty answer",
            model.identity().name
        )));
    }
    Ok(text)
}

/// Row indices whose generation call is timed: `k` distinct indices out of
/// `n`, drawn from a fresh rng seeded with the task seed.
pub fn measured_indices(seed: Option<u64>, n: usize, k: usize) -> HashSet<usize> {
    let k = k.min(n);
    if k == 0 {
        return HashSet::new();
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    rand::seq::index::sample(&mut rng, n, k).into_iter().collect()
}

/// Drives one task through the model under test.
pub struct Runner {
    model: Arc<dyn TextGenerator>,
    measure_k: usize,
    timeout: Option<Duration>,
}

impl Runner {
    pub fn new(model: Arc<dyn TextGenerator>) -> Self {
        Self {
            model,
            measure_k: DEFAULT_MEASURE_K,
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

    fn system_instruction(identity: &ModelIdentity) -> String {
        identity
            .system_prompt
            .clone()
            .filter(|prompt| !prompt.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
    }

    /// Samples the dataset, asks the model every question in sample order and
    /// returns the results with the run's metadata.
    ///
    /// The first failed generation aborts the run; nothing is retried.
    pub async fn run(&self, task: &Task) -> Result<(RunMetadata, ResultTable)> {
        let identity = self.model.identity();
        let system_instruction = Self::system_instruction(&identity);

        tracing::info!(
            "Starting run: task_id={}, kind={}, dataset={}, sample_size={}, seed={:?}, model={}",
            task.id(),
            task.kind(),
            task.dataset_path().display(),
            task.sample_size(),
            task.seed(),
            identity.name
        );

        let sampled = sample_rows(task)?;
        let n = sampled.len();
        let measured = measured_indices(task.seed(), n, self.measure_k);
        let mut latencies_ms: Vec<f64> = Vec::with_capacity(measured.len());
        let mut rows = Vec::with_capacity(n);

        for (idx, row) in sampled.into_iter().enumerate() {
            let prompt = build_prompt(task.kind(), &row, task.instruction())?;
            let request = GenerationRequest::new(prompt, system_instruction.clone())
                .with_timeout(self.timeout);

            let start = Instant::now();
            let answer = generate_text(self.model.as_ref(), request).await;
            let elapsed = start.elapsed();

            let answer = answer.map_err(|err| {
                tracing::error!("Model generation failed at row {}: {}", idx, err);
                let detail = match err {
                    BenchError::Model(msg) => msg,
                    other => other.to_string(),
                };
                BenchError::Model(format!("Generation failed at row {}: {}", idx, detail))
            })?;

            if measured.contains(&idx) {
                latencies_ms.push(elapsed.as_secs_f64() * 1000.0);
            }
            tracing::debug!("Row {} answered ({} chars)", idx, answer.len());
            rows.push(ResultRow::from_sample(row, answer));
        }

        let latency_ms_avg = if latencies_ms.is_empty() {
            None
        } else {
            let avg = latencies_ms.iter().sum::<f64>() / latencies_ms.len() as f64;
            Some((avg * 100.0).round() / 100.0)
        };

        let metadata = RunMetadata {
            run_id: RunId::generate(),
            task_id: task.id().clone(),
            task_kind: task.kind(),
            created_at: Utc::now(),
            dataset_path: task.dataset_path().display().to_string(),
            dataset_name: task.dataset_name(),
            sample_size: task.sample_size(),
            seed: task.seed(),
            replace: task.replace(),
            system_instruction,
            instruction: task.instruction().map(str::to_string),
            model_name: identity.name,
            model_params: identity.params,
            measured_count: latencies_ms.len(),
            latency_ms_avg,
            judge: None,
        };

        tracing::info!(
            "Run finished: run_id={}, rows={}, latency_ms_avg={:?}",
            metadata.run_id,
            rows.len(),
            metadata.latency_ms_avg
        );
        Ok((metadata, ResultTable::new(rows)))
    }
}
