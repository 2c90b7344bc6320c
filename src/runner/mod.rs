pub mod events;
pub mod provision;
pub mod state;

use colored::Colorize;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use crate::chain::NodeRpc;
use crate::driver::{BrowserSession, SessionFactory};
use crate::error::HarnessError;
use crate::identity::TestIdentity;
use crate::probe::{Findings, Probe, ProbeEnv};
use crate::report::{self, Environment, TestReport};
use crate::utils::config::HarnessConfig;

pub use events::*;
pub use state::*;

/// Runs the declared probes once, in order, and produces the report
pub struct Orchestrator {
    config: HarnessConfig,
    rpc: Box<dyn NodeRpc>,
    sessions: Box<dyn SessionFactory>,
    probes: Vec<Box<dyn Probe>>,
    sink: Box<dyn EventSink>,
    phase: RunPhase,
    extra_reports: bool,
}

impl Orchestrator {
    /// Fails if two probes share a name, since names key the report
    pub fn new(
        config: HarnessConfig,
        rpc: Box<dyn NodeRpc>,
        sessions: Box<dyn SessionFactory>,
        probes: Vec<Box<dyn Probe>>,
    ) -> Result<Self, HarnessError> {
        let mut seen = HashSet::new();
        for probe in &probes {
            if !seen.insert(probe.name()) {
                return Err(HarnessError::DuplicateProbe(probe.name().to_string()));
            }
        }

        Ok(Self {
            config,
            rpc,
            sessions,
            probes,
            sink: Box::new(NullSink),
            phase: RunPhase::Idle,
            extra_reports: false,
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Also write `report.html` and `junit.xml` next to the JSON report
    pub fn with_extra_reports(mut self, enabled: bool) -> Self {
        self.extra_reports = enabled;
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    fn set_phase(&mut self, phase: RunPhase) {
        self.phase = phase;
        self.sink.emit(HarnessEvent::PhaseChanged { phase });
    }

    /// Provision, run every probe, persist the report, then tear down.
    ///
    /// Probe failures end up in the report. Only identity and persistence
    /// failures are returned as errors; the browser is closed either way.
    pub async fn run(&mut self) -> Result<TestReport, HarnessError> {
        self.set_phase(RunPhase::Provisioning);
        let (identity, mut session) =
            match provision::setup(&self.config, self.sessions.as_ref(), self.sink.as_mut()).await
            {
                Ok(provisioned) => provisioned,
                Err(e) => {
                    self.set_phase(RunPhase::Done);
                    return Err(e);
                }
            };

        let results = self.run_probes(&identity, session.as_ref()).await;

        self.set_phase(RunPhase::Reporting);
        let environment = Environment {
            rpc_url: self.rpc.endpoint().to_string(),
            frontend_url: self.config.frontend_url.clone(),
            test_account: Some(identity.address().to_string()),
            browser_available: session.is_some(),
        };
        let report = report::generate(results, environment);
        let path = self.config.report_path();
        let persisted = report::persist(&report, &path);
        match &persisted {
            Ok(()) => {
                self.sink.emit(HarnessEvent::ReportSaved {
                    path: path.display().to_string(),
                    summary: report.summary(),
                });
                if self.extra_reports {
                    self.write_extra_reports(&report);
                }
            }
            Err(e) => log::error!("{}", e),
        }

        self.set_phase(RunPhase::CleaningUp);
        if let Some(session) = session.as_mut() {
            session.close().await;
        }
        self.set_phase(RunPhase::Done);

        persisted.map(|()| report)
    }

    async fn run_probes(
        &mut self,
        identity: &TestIdentity,
        session: Option<&BrowserSession>,
    ) -> Vec<ProbeResult> {
        let env = ProbeEnv {
            config: &self.config,
            identity,
            rpc: self.rpc.as_ref(),
            browser: session.and_then(|s| s.driver()),
        };

        let total = self.probes.len();
        let mut results = Vec::with_capacity(total);
        for (index, probe) in self.probes.iter().enumerate() {
            self.phase = RunPhase::Running { index };
            self.sink.emit(HarnessEvent::PhaseChanged { phase: self.phase });
            self.sink.emit(HarnessEvent::ProbeStarted {
                index,
                total,
                name: probe.name().to_string(),
            });

            let result = run_isolated(probe.as_ref(), &env).await;
            log::debug!("{} -> {}", result.name, result.status.label());
            self.sink.emit(HarnessEvent::ProbeFinished {
                index,
                result: result.clone(),
            });
            results.push(result);
        }
        results
    }

    fn write_extra_reports(&self, report: &TestReport) {
        let dir = &self.config.output_dir;
        if let Err(e) = report::html::write_report(report, dir) {
            log::warn!("html report: {:#}", e);
            println!("    {} Failed to write HTML report: {}", "⚠️".yellow(), e);
        }
        if let Err(e) = report::junit::write_report(report, dir) {
            log::warn!("junit report: {:#}", e);
            println!("    {} Failed to write JUnit report: {}", "⚠️".yellow(), e);
        }
    }
}

/// Run one probe. Always yields a result: `Err` and panics become `Failed`.
pub async fn run_isolated(probe: &dyn Probe, env: &ProbeEnv<'_>) -> ProbeResult {
    let mut findings = Findings::default();
    let start = Instant::now();
    let outcome = AssertUnwindSafe(probe.run(env, &mut findings))
        .catch_unwind()
        .await;
    let duration_ms = start.elapsed().as_millis() as u64;

    let (status, message) = match outcome {
        Ok(Ok(outcome)) => (outcome.status, outcome.message),
        Ok(Err(e)) => (
            ProbeStatus::Failed {
                error: format!("{:#}", e),
            },
            None,
        ),
        Err(panic) => (
            ProbeStatus::Failed {
                error: format!("probe panicked: {}", panic_message(panic.as_ref())),
            },
            None,
        ),
    };

    ProbeResult {
        name: probe.name().to_string(),
        status,
        message,
        notes: findings.into_notes(),
        duration_ms,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeFactory;
    use super::*;
    use crate::probe::testing::{test_config, FakeBrowser, FakeNode};
    use crate::probe::{default_probes, ProbeOutcome};
    use crate::report::exit;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::Ordering;

    struct StubProbe {
        name: &'static str,
        behavior: Behavior,
    }

    enum Behavior {
        Pass,
        Error,
        Panic,
    }

    #[async_trait]
    impl Probe for StubProbe {
        fn name(&self) -> &str {
            self.name
        }

        async fn run(&self, _env: &ProbeEnv<'_>, findings: &mut Findings) -> Result<ProbeOutcome> {
            findings.note(format!("{} started", self.name));
            match self.behavior {
                Behavior::Pass => Ok(ProbeOutcome::passed("ok")),
                Behavior::Error => Err(anyhow!("rpc exploded")),
                Behavior::Panic => panic!("index out of range"),
            }
        }
    }

    fn stub(name: &'static str, behavior: Behavior) -> Box<dyn Probe> {
        Box::new(StubProbe { name, behavior })
    }

    fn config_in(dir: &tempfile::TempDir) -> HarnessConfig {
        HarnessConfig {
            output_dir: dir.path().to_path_buf(),
            ..test_config()
        }
    }

    #[tokio::test]
    async fn test_unreachable_node_without_browser() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let report_path = config.report_path();
        let mut orchestrator = Orchestrator::new(
            config,
            Box::new(FakeNode::unreachable()),
            Box::new(FakeFactory::failing()),
            default_probes(),
        )
        .unwrap();

        let report = orchestrator.run().await.unwrap();

        assert_eq!(report.summary().total, 8);
        assert_eq!(report.summary().passed, 5);
        assert_eq!(report.summary().failed, 1);
        assert_eq!(report.summary().skipped, 2);
        assert!(report.results().get("Web3 Connection").unwrap().status.is_failed());
        assert!(matches!(
            report.results().get("Frontend Connection").unwrap().status,
            ProbeStatus::Skipped { .. }
        ));
        assert!(!report.environment.browser_available);
        assert_eq!(exit::decide(&report), 1);
        assert_eq!(orchestrator.phase(), RunPhase::Done);

        let persisted = report::load(&report_path).unwrap();
        assert_eq!(persisted.results().names(), report.results().names());
    }

    #[tokio::test]
    async fn test_healthy_stack_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let browser = FakeBrowser::healthy();
        let closed = browser.closed.clone();
        let sink = RecordingSink::default();
        let mut orchestrator = Orchestrator::new(
            config_in(&dir),
            Box::new(FakeNode::healthy()),
            Box::new(FakeFactory::with_browser(browser)),
            default_probes(),
        )
        .unwrap()
        .with_sink(Box::new(sink.clone()));

        let report = orchestrator.run().await.unwrap();

        assert_eq!(report.summary().passed, 8, "{:?}", report.results());
        assert_eq!(exit::decide(&report), 0);
        assert!(report.environment.browser_available);
        assert!(closed.load(Ordering::SeqCst));

        let events = sink.events();
        let started = events
            .iter()
            .filter(|e| matches!(e, HarnessEvent::ProbeStarted { .. }))
            .count();
        assert_eq!(started, 8);
        assert!(matches!(
            events.last(),
            Some(HarnessEvent::PhaseChanged {
                phase: RunPhase::Done
            })
        ));
    }

    #[tokio::test]
    async fn test_error_and_panic_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let mut orchestrator = Orchestrator::new(
            config_in(&dir),
            Box::new(FakeNode::healthy()),
            Box::new(FakeFactory::failing()),
            vec![
                stub("first", Behavior::Error),
                stub("second", Behavior::Panic),
                stub("third", Behavior::Pass),
            ],
        )
        .unwrap();

        let report = orchestrator.run().await.unwrap();

        assert_eq!(report.results().names(), vec!["first", "second", "third"]);
        assert_eq!(
            report.results().get("first").unwrap().status,
            ProbeStatus::Failed {
                error: "rpc exploded".into()
            }
        );
        let second = report.results().get("second").unwrap();
        assert_eq!(
            second.status,
            ProbeStatus::Failed {
                error: "probe panicked: index out of range".into()
            }
        );
        assert_eq!(second.notes, vec!["second started".to_string()]);
        assert_eq!(report.results().get("third").unwrap().status, ProbeStatus::Passed);
        assert_eq!(report.summary().failed, 2);
    }

    #[tokio::test]
    async fn test_browser_closed_when_persistence_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let config = HarnessConfig {
            output_dir: blocker.join("out"),
            ..test_config()
        };

        let browser = FakeBrowser::healthy();
        let closed = browser.closed.clone();
        let mut orchestrator = Orchestrator::new(
            config,
            Box::new(FakeNode::healthy()),
            Box::new(FakeFactory::with_browser(browser)),
            vec![stub("only", Behavior::Pass)],
        )
        .unwrap();

        let err = orchestrator.run().await.unwrap_err();
        assert!(matches!(err, HarnessError::ReportPersistence { .. }));
        assert!(closed.load(Ordering::SeqCst));
        assert_eq!(orchestrator.phase(), RunPhase::Done);
    }

    #[tokio::test]
    async fn test_extra_reports_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut orchestrator = Orchestrator::new(
            config_in(&dir),
            Box::new(FakeNode::healthy()),
            Box::new(FakeFactory::failing()),
            vec![stub("only", Behavior::Pass)],
        )
        .unwrap()
        .with_extra_reports(true);

        orchestrator.run().await.unwrap();
        assert!(dir.path().join("report.html").exists());
        assert!(dir.path().join("junit.xml").exists());
        assert!(dir.path().join("wallet_integration_report.json").exists());
    }

    #[test]
    fn test_duplicate_probe_names_rejected() {
        let result = Orchestrator::new(
            test_config(),
            Box::new(FakeNode::healthy()),
            Box::new(FakeFactory::failing()),
            vec![stub("same", Behavior::Pass), stub("same", Behavior::Error)],
        );
        assert!(matches!(result, Err(HarnessError::DuplicateProbe(name)) if name == "same"));
    }
}
