#![allow(dead_code)]

use async_trait::async_trait;
use llm_bench_core::*;
use mockall::mock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

mock! {
    pub Generator {}

    #[async_trait]
    impl TextGenerator for Generator {
        fn identity(&self) -> ModelIdentity;
        async fn generate(&self, request: GenerationRequest) -> Result<String>;
    }
}

/// A mock that always answers `reply`.
pub fn mock_replying(reply: &'static str) -> MockGenerator {
    let mut mock = MockGenerator::new();
    mock.expect_identity()
        .returning(|| ModelIdentity::new("mock-judge"));
    mock.expect_generate()
        .returning(move |_| Ok(reply.to_string()));
    mock
}

/// Answers by looking up the question a prompt starts with, and records
/// every request it receives.
pub struct ScriptedModel {
    identity: ModelIdentity,
    answers: HashMap<String, String>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedModel {
    pub fn new(answers: &[(&str, &str)]) -> Self {
        Self {
            identity: ModelIdentity::new("scripted-model")
                .with_params(serde_json::json!({"temperature": 0.0})),
            answers: answers
                .iter()
                .map(|(question, answer)| (question.to_string(), answer.to_string()))
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.prompt.clone())
            .collect()
    }
}

#[async_trait]
impl TextGenerator for ScriptedModel {
    fn identity(&self) -> ModelIdentity {
        self.identity.clone()
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let question = request.prompt.lines().next().unwrap_or_default().to_string();
        self.requests.lock().unwrap().push(request);
        self.answers
            .get(&question)
            .cloned()
            .ok_or_else(|| BenchError::Model(format!("no scripted answer for {:?}", question)))
    }
}

pub fn write_dataset(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Three capital-city questions, answers "Paris", "Berlin" and "Rome".
pub fn capitals_csv(dir: &TempDir) -> PathBuf {
    write_dataset(
        dir,
        "capitals.csv",
        "question_id,question,answer,category\n\
         q1,Capital of France?,Paris,europe\n\
         q2,Capital of Germany?,Berlin,europe\n\
         q3,Capital of Italy?,Rome,europe\n",
    )
}

/// Four two-option questions with true answers A, A, B, B.
pub fn multiple_choice_csv(dir: &TempDir) -> PathBuf {
    write_dataset(
        dir,
        "mc.csv",
        "question,options,answer\n\
         Q1?,yes||no,A\n\
         Q2?,yes||no,A\n\
         Q3?,yes||no,B\n\
         Q4?,yes||no,B\n",
    )
}

pub fn result_row(question: &str, model_answer: &str, true_answer: Option<&str>) -> ResultRow {
    ResultRow {
        question_id: None,
        question: question.to_string(),
        options: None,
        model_answer: model_answer.to_string(),
        true_answer: true_answer.map(str::to_string),
        category: None,
    }
}

pub fn answers_table(pairs: &[(&str, &str)]) -> ResultTable {
    ResultTable::new(
        pairs
            .iter()
            .map(|(answer, truth)| result_row("question", answer, Some(truth)))
            .collect(),
    )
}
