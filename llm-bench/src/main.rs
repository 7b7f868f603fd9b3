use anyhow::{Context, Result};
use llm_bench_core::TextGenerator;
use llm_bench_metrics::evaluators::{build_evaluator, Evaluator};
use llm_bench_sdk::ChatCompletionClient;
use llm_bench_workflow::{BenchmarkPipeline, Judge};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

use config::{BenchConfig, LogFormat};

fn init_tracing(config: &BenchConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("llm_bench={},{}", config.log_level, config.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let extra = std::env::args().nth(1);
    let config = BenchConfig::load(extra.as_deref())?;
    init_tracing(&config);

    tracing::info!("Starting llm-bench");

    let task = config.task.build().context("invalid task")?;
    let model: Arc<dyn TextGenerator> = Arc::new(
        ChatCompletionClient::new(config.model.client_config()).context("invalid model client")?,
    );
    let judge_model: Option<Arc<dyn TextGenerator>> = match &config.judge_model {
        Some(section) => Some(Arc::new(
            ChatCompletionClient::new(section.client_config())
                .context("invalid judge model client")?,
        )),
        None => None,
    };

    let judge = config.judge_spec(&task).build(judge_model)?;
    let evaluator = build_evaluator(config.evaluator_kind());
    tracing::info!(
        "Configuration loaded: task={}, model={}, judge={}, evaluator={}",
        task.kind(),
        config.model.name,
        judge.kind(),
        evaluator.kind()
    );

    let pipeline = BenchmarkPipeline::new(&config.output_dir)
        .with_measure_k(config.measure_k)
        .with_timeout(Some(Duration::from_secs(config.model.timeout_secs)));
    let output = pipeline
        .execute(&task, model, judge.as_ref(), evaluator.as_ref())
        .await?;

    tracing::info!(
        "Run {} finished: results={}, judged={}, report={}",
        output.metadata.run_id,
        output.results.path.display(),
        output.judged.path.display(),
        output.evaluation.path.display()
    );
    println!("{}", serde_json::to_string_pretty(&output.report.out)?);

    Ok(())
}
