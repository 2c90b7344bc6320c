use super::state::{ProbeResult, ProbeStatus, RunPhase, TestSummary};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Run events for real-time narration
#[derive(Debug, Clone)]
pub enum HarnessEvent {
    PhaseChanged {
        phase: RunPhase,
    },
    IdentityReady {
        address: String,
    },
    BrowserUnavailable {
        reason: String,
    },
    BrowserReady,
    ProbeStarted {
        index: usize,
        total: usize,
        name: String,
    },
    ProbeFinished {
        index: usize,
        result: ProbeResult,
    },
    ReportSaved {
        path: String,
        summary: TestSummary,
    },
}

/// Receives run events
pub trait EventSink: Send {
    fn emit(&mut self, event: HarnessEvent);
}

/// Discards everything
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: HarnessEvent) {}
}

/// Console narration: a spinner per running probe, one line per outcome
pub struct ConsoleNarrator {
    spinner: Option<ProgressBar>,
    interactive: bool,
}

impl ConsoleNarrator {
    pub fn new() -> Self {
        Self {
            spinner: None,
            interactive: std::io::stdout().is_terminal(),
        }
    }

    fn start_spinner(&mut self, message: String) {
        let pb = if self.interactive {
            ProgressBar::new_spinner()
        } else {
            // Piped output: no escape codes
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        };
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("  {spinner} {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for ConsoleNarrator {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ConsoleNarrator {
    fn emit(&mut self, event: HarnessEvent) {
        match event {
            HarnessEvent::PhaseChanged { phase } => {
                log::debug!("phase -> {}", phase);
                match phase {
                    RunPhase::Provisioning => {
                        println!("{} Setting up test environment...", "🔧".blue());
                    }
                    RunPhase::Reporting => {
                        println!("\n{} Generating test report...", "📊".blue());
                    }
                    RunPhase::CleaningUp => {
                        println!("\n{} Cleaning up test environment...", "🧹".blue());
                    }
                    _ => {}
                }
            }

            HarnessEvent::IdentityReady { address } => {
                println!("  {} Created test account: {}", "✓".green(), address.cyan());
            }

            HarnessEvent::BrowserReady => {
                println!("  {} Browser session ready", "✓".green());
            }

            HarnessEvent::BrowserUnavailable { reason } => {
                println!(
                    "  {} Browser not available, frontend probes will be skipped: {}",
                    "⚠️".yellow(),
                    reason.dimmed()
                );
            }

            HarnessEvent::ProbeStarted { index, total, name } => {
                println!(
                    "\n{} [{}/{}] {}",
                    "→".blue(),
                    index + 1,
                    total,
                    name.white().bold()
                );
                self.start_spinner(format!("{}...", name.dimmed()));
            }

            HarnessEvent::ProbeFinished { result, .. } => {
                self.stop_spinner();

                for note in &result.notes {
                    if let Some(warning) = note.strip_prefix("warning: ") {
                        println!("    {} {}", "⚠".yellow(), warning);
                    } else {
                        println!("    {}", note.dimmed());
                    }
                }

                let (icon, label) = match &result.status {
                    ProbeStatus::Passed => ("✓".green(), "PASSED".green().bold()),
                    ProbeStatus::Failed { .. } => ("✗".red(), "FAILED".red().bold()),
                    ProbeStatus::Skipped { .. } => ("○".yellow(), "SKIPPED".yellow().bold()),
                };
                let detail = match &result.status {
                    ProbeStatus::Passed => String::new(),
                    _ => format!(" - {}", result.diagnostic().unwrap_or_default()),
                };
                println!(
                    "  {} {}: {} ({}ms){}",
                    icon, label, result.name, result.duration_ms, detail
                );
            }

            HarnessEvent::ReportSaved { path, summary } => {
                println!("  {} Test report saved to: {}", "📄".blue(), path.cyan());
                println!(
                    "  {} passed, {} failed, {} skipped ({} total)",
                    summary.passed.to_string().green(),
                    summary.failed.to_string().red(),
                    summary.skipped.to_string().yellow(),
                    summary.total
                );
            }
        }
    }
}

/// Collects events in memory; clones share the same buffer
#[cfg(test)]
#[derive(Default, Clone)]
pub struct RecordingSink {
    events: std::sync::Arc<std::sync::Mutex<Vec<HarnessEvent>>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn events(&self) -> Vec<HarnessEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn emit(&mut self, event: HarnessEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
