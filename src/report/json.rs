use super::types::TestReport;
use anyhow::Result;
use std::path::Path;

/// Pretty JSON as persisted to disk
pub fn render(report: &TestReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Print or write the JSON form of a report
pub async fn generate(report: &TestReport, output: Option<&Path>) -> Result<()> {
    let json = render(report)?;

    match output {
        Some(path) => {
            super::write_atomic(path, json.as_bytes())?;
            println!("JSON report saved to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
