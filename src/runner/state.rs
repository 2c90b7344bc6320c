use serde::{Deserialize, Serialize};
use std::fmt;

/// Probe execution status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProbeStatus {
    Passed,
    Failed { error: String },
    Skipped { reason: String },
}

impl ProbeStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, ProbeStatus::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProbeStatus::Passed => "PASSED",
            ProbeStatus::Failed { .. } => "FAILED",
            ProbeStatus::Skipped { .. } => "SKIPPED",
        }
    }
}

/// Outcome of one probe as it appears in the report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub name: String,
    pub status: ProbeStatus,
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub duration_ms: u64,
}

impl ProbeResult {
    /// Text shown next to the status: error, skip reason, or message
    pub fn diagnostic(&self) -> Option<&str> {
        match &self.status {
            ProbeStatus::Failed { error } => Some(error),
            ProbeStatus::Skipped { reason } => Some(reason),
            ProbeStatus::Passed => self.message.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TestSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
}

impl TestSummary {
    /// Counts derived from the results; the only way a summary is built
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ProbeResult>,
    {
        results
            .into_iter()
            .fold(TestSummary::default(), |mut summary, result| {
                summary.total += 1;
                match result.status {
                    ProbeStatus::Passed => summary.passed += 1,
                    ProbeStatus::Failed { .. } => summary.failed += 1,
                    ProbeStatus::Skipped { .. } => summary.skipped += 1,
                }
                summary
            })
    }
}

/// Orchestrator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Provisioning,
    Running { index: usize },
    Reporting,
    CleaningUp,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "idle"),
            RunPhase::Provisioning => write!(f, "provisioning"),
            RunPhase::Running { index } => write!(f, "running probe {}", index + 1),
            RunPhase::Reporting => write!(f, "reporting"),
            RunPhase::CleaningUp => write!(f, "cleaning up"),
            RunPhase::Done => write!(f, "done"),
        }
    }
}
