use std::path::PathBuf;
use thiserror::Error;

/// Run-level failures. Anything not listed here stays inside a probe boundary.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to generate test identity: {0}")]
    Identity(String),

    #[error("failed to persist report to {path}: {source}")]
    ReportPersistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode report: {0}")]
    ReportEncoding(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("duplicate probe name: {0}")]
    DuplicateProbe(String),
}
