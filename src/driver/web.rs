//! Browser driver implementation using Playwright

use anyhow::{Context, Result};
use async_trait::async_trait;
use playwright::api::{Browser, BrowserContext, Page, Viewport};
use playwright::Playwright;
use std::path::PathBuf;
use tokio::sync::Mutex;

use colored::Colorize;

use super::traits::{BrowserDriver, SessionFactory, Selector};
use crate::utils::config::BrowserConfig;

/// Chromium session driven through Playwright
pub struct PlaywrightDriver {
    #[allow(dead_code)]
    playwright: Playwright,
    browser: Browser,
    #[allow(dead_code)]
    context: BrowserContext,
    page: Mutex<Page>,
}

impl PlaywrightDriver {
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;

        let chromium = playwright.chromium();
        let mut launcher = chromium.launcher().headless(config.headless);

        let executable = config.executable.clone().or_else(find_browser_executable);
        if let Some(ref path) = executable {
            println!("{} Using browser: {}", "🌐".blue(), path.display());
            launcher = launcher.executable(path);
        } else {
            log::info!("no browser executable found, using Playwright default");
        }

        let args: Vec<String> = [
            "--no-sandbox",
            "--disable-setuid-sandbox",
            "--disable-dev-shm-usage",
            "--disable-gpu",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        launcher = launcher.args(&args);

        let browser = launcher.launch().await.context("Failed to launch Chromium")?;
        let context = browser.context_builder().build().await?;
        let page = context.new_page().await?;
        page.set_viewport_size(Viewport {
            width: 1280,
            height: 720,
        })
        .await?;

        Ok(Self {
            playwright,
            browser,
            context,
            page: Mutex::new(page),
        })
    }

    fn selector_to_playwright(selector: &Selector) -> String {
        match selector {
            Selector::Css(css) => css.clone(),
            Selector::XPath(xpath) => format!("xpath={}", xpath),
            Selector::ClickableText(text) => {
                format!("button:has-text(\"{}\"):enabled", text.replace('"', "\\\""))
            }
        }
    }
}

#[async_trait]
impl BrowserDriver for PlaywrightDriver {
    async fn navigate(&self, url: &str, timeout_ms: u64) -> Result<()> {
        let page = self.page.lock().await;
        page.goto_builder(url)
            .timeout(timeout_ms as f64)
            .goto()
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    async fn wait_for_element(&self, selector: &Selector, timeout_ms: u64) -> Result<bool> {
        let page = self.page.lock().await;
        let sel = Self::selector_to_playwright(selector);

        let result = page
            .wait_for_selector_builder(&sel)
            .timeout(timeout_ms as f64)
            .wait_for_selector()
            .await;

        Ok(result.is_ok())
    }

    async fn title(&self) -> Result<String> {
        let page = self.page.lock().await;
        Ok(page.title().await?)
    }

    async fn rendered_text(&self) -> Result<String> {
        let page = self.page.lock().await;
        let js = "el => el.innerText || el.textContent || ''";
        let text = page
            .evaluate_on_selector::<String, _>("body", js, None::<String>)
            .await
            .context("Failed to read document body")?;
        Ok(text)
    }

    async fn close(&self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

/// Launches [`PlaywrightDriver`] sessions
pub struct PlaywrightFactory;

#[async_trait]
impl SessionFactory for PlaywrightFactory {
    async fn open(&self, config: &BrowserConfig) -> Result<Box<dyn BrowserDriver>> {
        Ok(Box::new(PlaywrightDriver::launch(config).await?))
    }
}

fn find_browser_executable() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("PLAYWRIGHT_CHROMIUM_EXECUTABLE_PATH") {
        return Some(PathBuf::from(path));
    }

    for name in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    let common_paths = [
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];
    common_paths
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}
