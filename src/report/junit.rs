use super::types::TestReport;
use crate::runner::state::{ProbeResult, ProbeStatus};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

/// Generate JUnit XML report string from a TestReport
pub fn generate_junit_xml(report: &TestReport) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let summary = report.summary();
    let total_ms: u64 = report.results().iter().map(|r| r.duration_ms).sum();
    let time = (total_ms as f64 / 1000.0).to_string();

    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "dapp-harness"));
    suites_start.push_attribute(("tests", summary.total.to_string().as_str()));
    suites_start.push_attribute(("failures", summary.failed.to_string().as_str()));
    suites_start.push_attribute(("skipped", summary.skipped.to_string().as_str()));
    suites_start.push_attribute(("time", time.as_str()));
    writer.write_event(Event::Start(suites_start))?;

    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", "wallet-integration"));
    suite_start.push_attribute(("tests", summary.total.to_string().as_str()));
    suite_start.push_attribute(("failures", summary.failed.to_string().as_str()));
    suite_start.push_attribute(("skipped", summary.skipped.to_string().as_str()));
    suite_start.push_attribute(("id", report.run_id.as_str()));
    suite_start.push_attribute(("time", time.as_str()));
    suite_start.push_attribute(("timestamp", report.timestamp.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for result in report.results() {
        write_test_case(&mut writer, result)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let xml = String::from_utf8(writer.into_inner().into_inner())?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(writer: &mut Writer<W>, result: &ProbeResult) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", result.name.as_str()));
    case_start.push_attribute(("classname", "wallet-integration"));
    case_start.push_attribute((
        "time",
        (result.duration_ms as f64 / 1000.0).to_string().as_str(),
    ));
    writer.write_event(Event::Start(case_start))?;

    match &result.status {
        ProbeStatus::Failed { error } => {
            let mut fail_start = BytesStart::new("failure");
            fail_start.push_attribute(("message", error.as_str()));
            fail_start.push_attribute(("type", "ProbeFailure"));
            writer.write_event(Event::Start(fail_start))?;
            writer.write_event(Event::Text(BytesText::new(error)))?;
            writer.write_event(Event::End(BytesEnd::new("failure")))?;
        }
        ProbeStatus::Skipped { reason } => {
            let mut skip = BytesStart::new("skipped");
            skip.push_attribute(("message", reason.as_str()));
            writer.write_event(Event::Empty(skip))?;
        }
        ProbeStatus::Passed => {}
    }

    if !result.notes.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("system-out")))?;
        writer.write_event(Event::Text(BytesText::new(&result.notes.join("\n"))))?;
        writer.write_event(Event::End(BytesEnd::new("system-out")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Print or write the JUnit form of a report
pub async fn generate(report: &TestReport, output: Option<&Path>) -> Result<()> {
    let xml = generate_junit_xml(report)?;
    match output {
        Some(path) => {
            super::write_atomic(path, xml.as_bytes())?;
            println!("JUnit report saved to: {}", path.display());
        }
        None => println!("{}", xml),
    }
    Ok(())
}

/// Write `junit.xml` into `output_dir`
pub fn write_report(report: &TestReport, output_dir: &Path) -> Result<()> {
    let xml = generate_junit_xml(report)?;
    let path = output_dir.join("junit.xml");
    super::write_atomic(&path, xml.as_bytes())?;
    println!("    Generated JUnit report: {}", path.display());
    Ok(())
}
