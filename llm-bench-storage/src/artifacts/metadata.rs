use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// What was written where: returned by every artifact write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactRecord {
    pub path: PathBuf,
    /// Size of the artifact in bytes
    pub size: u64,
    /// MIME content type
    pub content_type: String,
    /// SHA-256 checksum of the bytes on disk, hex encoded
    pub checksum: String,
    pub created_at: DateTime<Utc>,
}

impl ArtifactRecord {
    pub fn new(path: impl Into<PathBuf>, data: &[u8]) -> Self {
        let path = path.into();
        let content_type = detect_content_type(&path);
        Self {
            path,
            size: data.len() as u64,
            content_type,
            checksum: Self::compute_checksum(data),
            created_at: Utc::now(),
        }
    }

    pub fn compute_checksum(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    pub fn verify_checksum(&self, data: &[u8]) -> bool {
        Self::compute_checksum(data) == self.checksum
    }
}

pub fn detect_content_type(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => "application/json",
        "csv" => "text/csv",
        "jsonl" => "application/x-ndjson",
        _ => "application/octet-stream",
    }
    .to_string()
}
