use anyhow::{Context, Result};
use config::{Config as ConfigLoader, Environment, File};
use llm_bench_core::{EvaluatorKind, Task, TaskKind};
use llm_bench_sdk::{ClientConfig, DEFAULT_BASE_URL};
use llm_bench_workflow::{JudgeSpec, PIPELINE_MEASURE_K};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TaskSection {
    pub kind: TaskKind,
    pub dataset_path: PathBuf,
    #[validate(range(min = 1))]
    pub sample_size: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub replace: bool,
}

impl TaskSection {
    pub fn build(&self) -> Result<Task> {
        let mut task = Task::new(self.kind, self.dataset_path.clone(), self.sample_size)?
            .with_replacement(self.replace);
        if let Some(seed) = self.seed {
            task = task.with_seed(seed);
        }
        if let Some(instruction) = &self.instruction {
            task = task.with_instruction(instruction.clone());
        }
        Ok(task)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ModelSection {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ModelSection {
    /// Falls back to `OPENAI_API_KEY` when no key is configured.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.base_url.clone(), self.name.clone())
            .with_params(self.params.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(api_key) = self
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        {
            config = config.with_api_key(api_key);
        }
        if let Some(system_prompt) = &self.system_prompt {
            config = config.with_system_prompt(system_prompt.clone());
        }
        config
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BenchConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "default_measure_k")]
    pub measure_k: usize,

    #[validate(nested)]
    pub task: TaskSection,
    #[validate(nested)]
    pub model: ModelSection,
    #[serde(default)]
    #[validate(nested)]
    pub judge_model: Option<ModelSection>,

    /// Defaults per task kind when absent.
    #[serde(default)]
    pub judge: Option<JudgeSpec>,
    #[serde(default)]
    pub evaluator: Option<EvaluatorKind>,
}

impl BenchConfig {
    /// `config/default`, `config/local`, an optional extra file, then
    /// `LLM_BENCH__*` environment variables.
    pub fn load(extra: Option<&str>) -> Result<Self> {
        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));
        if let Some(path) = extra {
            builder = builder.add_source(File::with_name(path));
        }
        let config = builder
            .add_source(Environment::with_prefix("LLM_BENCH").separator("__"))
            .build()
            .context("failed to read configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("invalid configuration")?;
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    pub fn judge_spec(&self, task: &Task) -> JudgeSpec {
        self.judge
            .clone()
            .unwrap_or_else(|| JudgeSpec::default_for(task))
    }

    pub fn evaluator_kind(&self) -> EvaluatorKind {
        self.evaluator
            .unwrap_or_else(|| EvaluatorKind::default_for(self.task.kind))
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_measure_k() -> usize {
    PIPELINE_MEASURE_K
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}
