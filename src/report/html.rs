use super::types::TestReport;
use crate::runner::state::{ProbeResult, ProbeStatus};
use anyhow::Result;
use std::path::Path;

/// Print or write the HTML form of a report
pub async fn generate(report: &TestReport, output: Option<&Path>) -> Result<()> {
    let html = generate_html(report);

    if let Some(path) = output {
        super::write_atomic(path, html.as_bytes())?;
        println!("HTML report saved to: {}", path.display());
    } else {
        println!("{}", html);
    }

    Ok(())
}

/// Write `report.html` into `output_dir`
pub fn write_report(report: &TestReport, output_dir: &Path) -> Result<()> {
    let path = output_dir.join("report.html");
    super::write_atomic(&path, generate_html(report).as_bytes())?;
    println!("    Generated HTML report: {}", path.display());
    Ok(())
}

fn probe_row(result: &ProbeResult) -> String {
    let (status_icon, status_class) = match &result.status {
        ProbeStatus::Passed => ("✓", "passed"),
        ProbeStatus::Failed { .. } => ("✗", "failed"),
        ProbeStatus::Skipped { .. } => ("○", "skipped"),
    };

    let detail_html = match (&result.status, &result.message) {
        (ProbeStatus::Failed { error }, _) => {
            format!(r#"<div class="error-message">{}</div>"#, html_escape(error))
        }
        (ProbeStatus::Skipped { reason }, _) => {
            format!(r#"<div class="detail">{}</div>"#, html_escape(reason))
        }
        (ProbeStatus::Passed, Some(message)) => {
            format!(r#"<div class="detail">{}</div>"#, html_escape(message))
        }
        (ProbeStatus::Passed, None) => String::new(),
    };

    let notes_html = if result.notes.is_empty() {
        String::new()
    } else {
        let items: String = result
            .notes
            .iter()
            .map(|n| format!("<li>{}</li>", html_escape(n)))
            .collect();
        format!(r#"<ul class="notes">{}</ul>"#, items)
    };

    format!(
        r#"
            <div class="probe {status_class}">
                <div class="probe-icon">{status_icon}</div>
                <div class="probe-content">
                    <div class="probe-name">{name}</div>
                    <span class="duration">{duration}</span>
                    {detail_html}
                    {notes_html}
                </div>
            </div>"#,
        name = html_escape(&result.name),
        duration = format_duration(result.duration_ms),
    )
}

pub fn generate_html(report: &TestReport) -> String {
    let summary = report.summary();
    let executed = summary.passed + summary.failed;
    let pass_rate = if executed > 0 {
        (summary.passed as f64 / executed as f64 * 100.0) as u32
    } else {
        0
    };

    let probes_html: String = report.results().iter().map(probe_row).collect();
    let env = &report.environment;
    let account = env.test_account.as_deref().unwrap_or("none");
    let browser = if env.browser_available { "available" } else { "unavailable" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Wallet Integration Report - {run_id}</title>
    <style>
        :root {{
            --bg-primary: #0a0f1d;
            --bg-secondary: #141b2d;
            --border: #374151;
            --text-primary: #f9fafb;
            --text-secondary: #9ca3af;
            --green: #10b981;
            --red: #ef4444;
            --yellow: #f59e0b;
        }}
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: system-ui, -apple-system, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.5;
            padding: 3rem 1rem;
        }}
        .container {{ max-width: 960px; margin: 0 auto; }}
        h1 {{ font-size: 2rem; font-weight: 800; margin-bottom: 2rem; }}
        .summary {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
            gap: 1rem;
            margin-bottom: 2rem;
        }}
        .stat {{
            background: var(--bg-secondary);
            border: 1px solid var(--border);
            padding: 1.25rem;
            border-radius: 1rem;
        }}
        .stat-value {{ font-size: 2rem; font-weight: 800; }}
        .stat-label {{ color: var(--text-secondary); font-size: 0.8rem; text-transform: uppercase; }}
        .stat.passed .stat-value {{ color: var(--green); }}
        .stat.failed .stat-value {{ color: var(--red); }}
        .stat.skipped .stat-value {{ color: var(--yellow); }}
        .environment {{ color: var(--text-secondary); font-size: 0.875rem; margin-bottom: 2rem; }}
        .environment code {{ color: var(--text-primary); }}
        .probe {{
            background: var(--bg-secondary);
            border: 1px solid var(--border);
            border-radius: 0.75rem;
            padding: 1rem;
            display: flex;
            gap: 1rem;
            margin-bottom: 0.75rem;
        }}
        .probe-icon {{ font-size: 1.25rem; width: 2rem; text-align: center; }}
        .probe.passed .probe-icon {{ color: var(--green); }}
        .probe.failed .probe-icon {{ color: var(--red); }}
        .probe.skipped .probe-icon {{ color: var(--yellow); }}
        .probe-content {{ flex: 1; }}
        .probe-name {{ font-weight: 600; }}
        .duration {{ color: var(--text-secondary); font-size: 0.75rem; }}
        .detail {{ color: var(--text-secondary); font-size: 0.85rem; margin-top: 0.25rem; }}
        .notes {{ color: var(--text-secondary); font-size: 0.8rem; margin: 0.5rem 0 0 1.25rem; }}
        .error-message {{
            background: rgba(239, 68, 68, 0.1);
            border: 1px solid rgba(239, 68, 68, 0.2);
            border-radius: 0.5rem;
            padding: 0.75rem;
            margin-top: 0.5rem;
            color: #fca5a5;
            font-family: monospace;
            font-size: 0.8rem;
        }}
        .meta {{
            margin-top: 3rem;
            color: var(--text-secondary);
            font-size: 0.8rem;
            text-align: center;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Wallet Integration Report</h1>

        <div class="summary">
            <div class="stat"><div class="stat-value">{total}</div><div class="stat-label">Probes</div></div>
            <div class="stat passed"><div class="stat-value">{passed}</div><div class="stat-label">Passed</div></div>
            <div class="stat failed"><div class="stat-value">{failed}</div><div class="stat-label">Failed</div></div>
            <div class="stat skipped"><div class="stat-value">{skipped}</div><div class="stat-label">Skipped</div></div>
            <div class="stat"><div class="stat-value">{pass_rate}%</div><div class="stat-label">Pass rate</div></div>
        </div>

        <div class="environment">
            RPC <code>{rpc_url}</code> &middot; Frontend <code>{frontend_url}</code>
            &middot; Account <code>{account}</code> &middot; Browser {browser}
        </div>

        {probes_html}

        <div class="meta">Run {run_id} &middot; Generated {timestamp}</div>
    </div>
</body>
</html>"#,
        run_id = html_escape(&report.run_id),
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        rpc_url = html_escape(&env.rpc_url),
        frontend_url = html_escape(&env.frontend_url),
        account = html_escape(account),
        timestamp = html_escape(&report.timestamp),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60000;
        let seconds = (ms % 60000) as f64 / 1000.0;
        format!("{}m {:.0}s", minutes, seconds)
    }
}
