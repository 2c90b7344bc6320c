use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use super::{Findings, Probe, ProbeEnv, ProbeOutcome};
use crate::driver::Selector;

const NO_BROWSER: &str = "browser session unavailable";

/// Loads the frontend root and checks the wallet entry point and title
pub struct FrontendLoadProbe;

#[async_trait]
impl Probe for FrontendLoadProbe {
    fn name(&self) -> &str {
        "Frontend Connection"
    }

    async fn run(&self, env: &ProbeEnv<'_>, findings: &mut Findings) -> Result<ProbeOutcome> {
        let Some(browser) = env.browser else {
            return Ok(ProbeOutcome::skipped(NO_BROWSER));
        };
        let config = env.config;

        if let Err(e) = browser
            .navigate(&config.frontend_url, config.page_load_timeout_ms)
            .await
        {
            return Ok(ProbeOutcome::failed(format!("{:#}", e)));
        }
        findings.note(format!("Navigated to {}", config.frontend_url));

        let body = Selector::Css("body".to_string());
        if !browser
            .wait_for_element(&body, config.page_load_timeout_ms)
            .await?
        {
            return Ok(ProbeOutcome::failed(format!(
                "document body not present after {}ms",
                config.page_load_timeout_ms
            )));
        }

        let connect = Selector::ClickableText("Connect Wallet".to_string());
        if browser
            .wait_for_element(&connect, config.element_timeout_ms)
            .await?
        {
            findings.note("Connect Wallet button found");
        } else {
            findings.warn(format!(
                "Connect Wallet button not clickable within {}ms",
                config.element_timeout_ms
            ));
        }

        let title = browser.title().await?;
        if title.contains(&config.product_name) {
            findings.note(format!("Page title correct: {}", title));
        } else {
            findings.warn(format!(
                "Page title {:?} does not contain {:?}",
                title, config.product_name
            ));
        }

        Ok(ProbeOutcome::passed(title))
    }
}

/// Scans the rendered page for the expected marketing copy
pub struct FrontendContentProbe;

/// `(expected, found)` for every expected string, in order
pub fn scan_content<'a>(text: &str, expected: &'a [String]) -> Vec<(&'a str, bool)> {
    expected
        .iter()
        .map(|item| (item.as_str(), text.contains(item.as_str())))
        .collect()
}

#[async_trait]
impl Probe for FrontendContentProbe {
    fn name(&self) -> &str {
        "Marketplace Functionality"
    }

    async fn run(&self, env: &ProbeEnv<'_>, findings: &mut Findings) -> Result<ProbeOutcome> {
        let Some(browser) = env.browser else {
            return Ok(ProbeOutcome::skipped(NO_BROWSER));
        };
        let config = env.config;

        if let Err(e) = browser
            .navigate(&config.frontend_url, config.page_load_timeout_ms)
            .await
        {
            return Ok(ProbeOutcome::failed(format!("{:#}", e)));
        }

        tokio::time::sleep(Duration::from_millis(config.settle_delay_ms)).await;

        let text = browser.rendered_text().await?;
        let results = scan_content(&text, &config.expected_content);
        let mut found = 0;
        for (item, present) in &results {
            if *present {
                found += 1;
                findings.note(format!("Found marketplace element: {}", item));
            } else {
                findings.warn(format!("Missing marketplace element: {}", item));
            }
        }

        Ok(ProbeOutcome::passed(format!(
            "{}/{} expected elements present",
            found,
            results.len()
        )))
    }
}
