use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;

/// Harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HarnessConfig {
    /// JSON-RPC endpoint of the node under test
    pub rpc_url: String,

    /// Root URL of the frontend under test
    pub frontend_url: String,

    /// Directory the report is written to
    pub output_dir: PathBuf,

    /// Report file name inside `output_dir`
    pub report_file: String,

    /// Product name expected in the page title
    pub product_name: String,

    /// Chain id the probe transaction is signed for
    pub chain_id: u64,

    pub rpc_timeout_ms: u64,

    /// Wait for the document body (ms)
    pub page_load_timeout_ms: u64,

    /// Wait for the "Connect Wallet" element (ms)
    pub element_timeout_ms: u64,

    /// Settle delay before scanning page content (ms)
    pub settle_delay_ms: u64,

    /// Identities created by the signing benchmark
    pub benchmark_identities: usize,

    pub browser: BrowserConfig,

    /// Strings the frontend is expected to render
    pub expected_content: Vec<String>,

    /// Network name reported in the SDK configuration
    pub network: String,

    /// Named contract addresses validated by the SDK configuration probe
    pub contracts: BTreeMap<String, String>,

    /// Target of the simulated contract call
    pub call_target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserConfig {
    /// Attempt to open a browser session at all
    pub enabled: bool,
    pub headless: bool,
    /// Explicit browser executable; discovered when unset
    pub executable: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            headless: true,
            executable: None,
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let mut contracts = BTreeMap::new();
        contracts.insert(
            "marketplace".to_string(),
            "0x1234567890123456789012345678901234567890".to_string(),
        );
        contracts.insert(
            "utilityToken".to_string(),
            "0x0987654321098765432109876543210987654321".to_string(),
        );

        Self {
            rpc_url: "http://localhost:8545".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            output_dir: PathBuf::from("./output"),
            report_file: "wallet_integration_report.json".to_string(),
            product_name: "LithosProtocol".to_string(),
            chain_id: 1337,
            rpc_timeout_ms: 5000,
            page_load_timeout_ms: 10_000,
            element_timeout_ms: 5000,
            settle_delay_ms: 2000,
            benchmark_identities: 10,
            browser: BrowserConfig::default(),
            expected_content: vec![
                "Marketplace".to_string(),
                "Game Assets".to_string(),
                "Rare Collectibles".to_string(),
                "True Ownership".to_string(),
            ],
            network: "localhost".to_string(),
            contracts,
            call_target: "0x1234567890123456789012345678901234567890".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Defaults, overlaid by an optional YAML file, then by `HARNESS_*` env vars
    pub fn load(path: Option<&Path>) -> Result<Self, HarnessError> {
        let mut config = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HarnessError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, HarnessError> {
        serde_yaml::from_str(content).map_err(|e| HarnessError::Config(e.to_string()))
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("HARNESS_RPC_URL") {
            self.rpc_url = url;
        }
        if let Some(url) = lookup("HARNESS_FRONTEND_URL") {
            self.frontend_url = url;
        }
        if let Some(dir) = lookup("HARNESS_OUTPUT") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(v) = lookup("HARNESS_HEADLESS") {
            self.browser.headless = v == "true" || v == "1";
        }
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.rpc_url.trim().is_empty() {
            return Err(HarnessError::Config("rpcUrl must not be empty".into()));
        }
        if self.frontend_url.trim().is_empty() {
            return Err(HarnessError::Config("frontendUrl must not be empty".into()));
        }
        if self.report_file.trim().is_empty() {
            return Err(HarnessError::Config("reportFile must not be empty".into()));
        }
        if self.settle_delay_ms > 60_000 {
            return Err(HarnessError::Config(format!(
                "settleDelayMs {} is longer than a minute",
                self.settle_delay_ms
            )));
        }
        Ok(())
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }
}
