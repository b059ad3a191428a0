//! 业务逻辑服务层

mod artifact_writer;
mod generator;

pub use artifact_writer::{ArtifactWriter, DEFAULT_PREVIEW_LINES, WriteOutcome};
pub use generator::{DEFAULT_ZONES_DIR, GeneratorOptions, GeneratorService, RunIssue, RunSummary};
