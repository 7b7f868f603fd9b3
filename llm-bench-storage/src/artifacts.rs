pub mod metadata;
pub mod repository;
pub mod writer;

pub use metadata::{ArtifactRecord, detect_content_type};
pub use repository::ArtifactRepository;
pub use writer::{write_judged_csv, write_report_json, write_results_csv};
