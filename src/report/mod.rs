pub mod exit;
pub mod html;
pub mod json;
pub mod junit;
pub mod types;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::error::HarnessError;
use crate::runner::state::ProbeResult;
pub use types::{Environment, ResultMap, TestReport};

/// Build a report stamped with the current local time and a fresh run id
pub fn generate(results: Vec<ProbeResult>, environment: Environment) -> TestReport {
    generate_at(
        results,
        environment,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        uuid::Uuid::new_v4().to_string(),
    )
}

/// Build a report; the summary is always recomputed from `results`
pub fn generate_at(
    results: Vec<ProbeResult>,
    environment: Environment,
    timestamp: String,
    run_id: String,
) -> TestReport {
    TestReport::new(run_id, timestamp, environment, ResultMap::new(results))
}

/// Write the report as pretty JSON in one atomic step.
pub fn persist(report: &TestReport, path: &Path) -> Result<(), HarnessError> {
    let json = json::render(report)?;
    write_atomic(path, json.as_bytes()).map_err(|source| HarnessError::ReportPersistence {
        path: path.to_path_buf(),
        source,
    })
}

/// Write through a temp file in the destination directory, then rename over `path`
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read a persisted report. The stored summary is discarded and recomputed.
pub fn load(path: &Path) -> Result<TestReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Re-render a persisted report in another format
pub async fn generate_report(results_path: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let report = load(results_path)?;

    match format {
        "json" => json::generate(&report, output).await,
        "html" => html::generate(&report, output).await,
        "junit" => junit::generate(&report, output).await,
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::ProbeStatus;

    fn result(name: &str, status: ProbeStatus) -> ProbeResult {
        ProbeResult {
            name: name.to_string(),
            status,
            message: None,
            notes: vec![],
            duration_ms: 3,
        }
    }

    fn environment() -> Environment {
        Environment {
            rpc_url: "http://localhost:8545".into(),
            frontend_url: "http://localhost:5173".into(),
            test_account: Some("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".into()),
            browser_available: false,
        }
    }

    fn sample_report() -> TestReport {
        generate_at(
            vec![
                result("Web3 Connection", ProbeStatus::Failed { error: "refused".into() }),
                result("Account Operations", ProbeStatus::Passed),
                result("Frontend Connection", ProbeStatus::Skipped { reason: "no browser".into() }),
            ],
            environment(),
            "2026-01-01 00:00:00".into(),
            "run-1".into(),
        )
    }

    #[test]
    fn test_generate_computes_summary() {
        let summary = sample_report().summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_results_serialize_as_ordered_object() {
        let json = serde_json::to_string(&sample_report()).unwrap();
        let a = json.find("\"Web3 Connection\"").unwrap();
        let b = json.find("\"Account Operations\"").unwrap();
        let c = json.find("\"Frontend Connection\"").unwrap();
        assert!(a < b && b < c);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["results"]["Account Operations"]["status"]["type"], "passed");
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["environment"]["testAccount"], "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    }

    #[test]
    fn test_persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        let report = sample_report();

        persist(&report, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, report);
        assert_eq!(loaded.results().names(), report.results().names());

        // Overwrite on the next run
        let mut second = sample_report();
        second.run_id = "run-2".into();
        persist(&second, &path).unwrap();
        assert_eq!(load(&path).unwrap().run_id, "run-2");
    }

    #[test]
    fn test_load_recomputes_tampered_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        persist(&sample_report(), &path).unwrap();

        let mut stored: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        stored["summary"]["failed"] = 0.into();
        stored["summary"]["passed"] = 3.into();
        std::fs::write(&path, stored.to_string()).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.summary().failed, 1);
        assert_eq!(loaded.summary().passed, 1);
    }

    #[test]
    fn test_summary_is_optional_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        persist(&sample_report(), &path).unwrap();

        let mut stored: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        stored.as_object_mut().unwrap().remove("summary");
        std::fs::write(&path, stored.to_string()).unwrap();

        assert_eq!(load(&path).unwrap().summary().total, 3);
    }

    #[test]
    fn test_persist_failure_is_fatal_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let err = persist(&sample_report(), &blocker.join("report.json")).unwrap_err();
        assert!(matches!(err, HarnessError::ReportPersistence { .. }));
    }
}
