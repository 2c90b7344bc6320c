use super::TestReport;

/// Exit status when no probe failed
pub const EXIT_OK: i32 = 0;
/// Exit status when at least one probe failed
pub const EXIT_FAILED: i32 = 1;

/// Map a report to the process exit status. Skipped probes never count as failures.
pub fn decide(report: &TestReport) -> i32 {
    if report.summary().failed == 0 {
        EXIT_OK
    } else {
        EXIT_FAILED
    }
}
