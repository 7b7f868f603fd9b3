use llm_bench_core::{BenchError, ResultTable, Result, RunId};
use std::fs;
use std::path::{Path, PathBuf};

use super::metadata::ArtifactRecord;
use super::writer;

/// A run-scoped output directory, `<output_root>/runs/<run_id>/`.
///
/// Owned by exactly one run: creation fails if the directory already exists.
#[derive(Debug, Clone)]
pub struct ArtifactRepository {
    run_id: RunId,
    dir: PathBuf,
}

impl ArtifactRepository {
    pub fn create(output_root: impl AsRef<Path>, run_id: &RunId) -> Result<Self> {
        let runs = output_root.as_ref().join("runs");
        fs::create_dir_all(&runs)
            .map_err(|e| BenchError::Storage(format!("{}: {}", runs.display(), e)))?;

        let dir = runs.join(run_id.as_str());
        fs::create_dir(&dir).map_err(|e| {
            BenchError::Storage(format!(
                "Cannot claim run directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        tracing::info!("Created run directory: run_id={}, dir={}", run_id, dir.display());
        Ok(Self {
            run_id: run_id.clone(),
            dir,
        })
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn results_path(&self) -> PathBuf {
        self.dir.join(format!("run_{}.csv", self.run_id))
    }

    pub fn judged_path(&self) -> PathBuf {
        self.dir.join(format!("judge_{}.csv", self.run_id))
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(format!("eval_{}.json", self.run_id))
    }

    pub fn save_results(&self, table: &ResultTable) -> Result<ArtifactRecord> {
        writer::write_results_csv(&self.results_path(), table)
    }
}
