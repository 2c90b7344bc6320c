//! Capability probes
//!
//! Each probe checks one capability and yields a single [`ProbeOutcome`].
//! Expected failures (node unreachable, page timeout) come back as
//! [`ProbeOutcome::failed`]; an `Err` means something unexpected broke and is
//! recorded as a failure by the orchestrator all the same.

pub mod benchmark;
pub mod connectivity;
pub mod contract_call;
pub mod frontend;
pub mod identity_ops;
pub mod sdk_config;
pub mod transaction;

use anyhow::Result;
use async_trait::async_trait;

use crate::chain::NodeRpc;
use crate::driver::BrowserDriver;
use crate::identity::TestIdentity;
use crate::runner::state::ProbeStatus;
use crate::utils::config::HarnessConfig;

/// What a probe may touch while it runs
pub struct ProbeEnv<'a> {
    pub config: &'a HarnessConfig,
    pub identity: &'a TestIdentity,
    pub rpc: &'a dyn NodeRpc,
    pub browser: Option<&'a dyn BrowserDriver>,
}

/// Result of a single probe run, before the orchestrator stamps name and timing
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub status: ProbeStatus,
    pub message: Option<String>,
}

impl ProbeOutcome {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Passed,
            message: Some(message.into()),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Failed {
                error: error.into(),
            },
            message: None,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Skipped {
                reason: reason.into(),
            },
            message: None,
        }
    }
}

/// Informational lines and soft warnings gathered while a probe runs
#[derive(Debug, Default, Clone)]
pub struct Findings {
    notes: Vec<String>,
    warnings: usize,
}

impl Findings {
    pub fn note(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::info!("{}", line);
        self.notes.push(line);
    }

    pub fn warn(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::warn!("{}", line);
        self.warnings += 1;
        self.notes.push(format!("warning: {}", line));
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn into_notes(self) -> Vec<String> {
        self.notes
    }
}

#[async_trait]
pub trait Probe: Send + Sync {
    /// Unique name within a run; used as the report key
    fn name(&self) -> &str;

    async fn run(&self, env: &ProbeEnv<'_>, findings: &mut Findings) -> Result<ProbeOutcome>;
}

/// The declared probe sequence. Order is part of the report contract.
pub fn default_probes() -> Vec<Box<dyn Probe>> {
    vec![
        Box::new(connectivity::ConnectivityProbe),
        Box::new(identity_ops::IdentityOpsProbe),
        Box::new(transaction::TransactionProbe),
        Box::new(contract_call::ContractCallProbe),
        Box::new(frontend::FrontendLoadProbe),
        Box::new(frontend::FrontendContentProbe),
        Box::new(sdk_config::SdkConfigProbe),
        Box::new(benchmark::SigningBenchmarkProbe),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fakes shared by probe and runner tests

    use super::*;
    use crate::driver::Selector;
    use anyhow::bail;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    pub struct FakeNode {
        pub live: bool,
        pub chain_id: u64,
        pub block: u64,
    }

    impl FakeNode {
        pub fn healthy() -> Self {
            Self {
                live: true,
                chain_id: 1337,
                block: 7,
            }
        }

        pub fn unreachable() -> Self {
            Self {
                live: false,
                chain_id: 0,
                block: 0,
            }
        }
    }

    #[async_trait]
    impl NodeRpc for FakeNode {
        async fn is_live(&self) -> Result<bool> {
            Ok(self.live)
        }

        async fn chain_id(&self) -> Result<u64> {
            if !self.live {
                bail!("connection refused");
            }
            Ok(self.chain_id)
        }

        async fn block_number(&self) -> Result<u64> {
            if !self.live {
                bail!("connection refused");
            }
            Ok(self.block)
        }

        async fn send_raw_transaction(&self, _raw: &[u8]) -> Result<String> {
            bail!("not used")
        }

        fn endpoint(&self) -> &str {
            "fake://node"
        }
    }

    /// Scripted page: what exists, what the title and text are
    #[derive(Clone)]
    pub struct FakeBrowser {
        pub navigation_fails: bool,
        pub has_body: bool,
        pub has_connect_button: bool,
        pub title: String,
        pub text: String,
        pub closed: Arc<AtomicBool>,
        pub navigations: Arc<AtomicUsize>,
    }

    impl FakeBrowser {
        pub fn healthy() -> Self {
            Self {
                navigation_fails: false,
                has_body: true,
                has_connect_button: true,
                title: "LithosProtocol | Play to Own".to_string(),
                text: "Marketplace\nGame Assets\nRare Collectibles\nTrue Ownership".to_string(),
                closed: Arc::new(AtomicBool::new(false)),
                navigations: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl BrowserDriver for FakeBrowser {
        async fn navigate(&self, url: &str, _timeout_ms: u64) -> Result<()> {
            self.navigations.fetch_add(1, Ordering::SeqCst);
            if self.navigation_fails {
                bail!("net::ERR_CONNECTION_REFUSED at {}", url);
            }
            Ok(())
        }

        async fn wait_for_element(&self, selector: &Selector, _timeout_ms: u64) -> Result<bool> {
            Ok(match selector {
                Selector::Css(css) if css == "body" => self.has_body,
                Selector::ClickableText(_) => self.has_connect_button,
                _ => false,
            })
        }

        async fn title(&self) -> Result<String> {
            Ok(self.title.clone())
        }

        async fn rendered_text(&self) -> Result<String> {
            Ok(self.text.clone())
        }

        async fn close(&self) -> Result<()> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    pub fn test_config() -> HarnessConfig {
        HarnessConfig {
            settle_delay_ms: 0,
            benchmark_identities: 3,
            ..HarnessConfig::default()
        }
    }
}
