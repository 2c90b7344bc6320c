use anyhow::Result;
use async_trait::async_trait;

use crate::utils::config::BrowserConfig;

/// Element selector for the pages under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Select by CSS selector
    Css(String),
    /// Select by XPath
    XPath(String),
    /// Visible, enabled button whose text contains the given string
    ClickableText(String),
}

/// Browser operations the frontend probes consume
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate the page to `url`
    async fn navigate(&self, url: &str, timeout_ms: u64) -> Result<()>;

    /// Wait until `selector` matches; `Ok(false)` on timeout
    async fn wait_for_element(&self, selector: &Selector, timeout_ms: u64) -> Result<bool>;

    async fn title(&self) -> Result<String>;

    /// Text rendered in the document body
    async fn rendered_text(&self) -> Result<String>;

    /// Release the underlying browser
    async fn close(&self) -> Result<()>;
}

/// Opens browser sessions
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self, config: &BrowserConfig) -> Result<Box<dyn BrowserDriver>>;
}
