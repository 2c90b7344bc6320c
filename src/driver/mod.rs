pub mod traits;
pub mod web;

use colored::Colorize;

pub use traits::{BrowserDriver, Selector, SessionFactory};

/// The one browser session of a run.
///
/// Closed explicitly through [`BrowserSession::close`]. Dropping an unclosed
/// session (a cancelled run, a panic before teardown) schedules the close on
/// the current tokio runtime.
pub struct BrowserSession {
    driver: Option<Box<dyn BrowserDriver>>,
}

impl BrowserSession {
    pub fn new(driver: Box<dyn BrowserDriver>) -> Self {
        Self {
            driver: Some(driver),
        }
    }

    pub fn driver(&self) -> Option<&dyn BrowserDriver> {
        self.driver.as_deref()
    }

    /// Close the browser. Idempotent; errors are logged, not returned.
    pub async fn close(&mut self) {
        if let Some(driver) = self.driver.take() {
            match driver.close().await {
                Ok(()) => println!("{} Browser session closed", "✓".green()),
                Err(e) => {
                    log::warn!("browser session close failed: {:#}", e);
                    println!("{} Browser close failed: {}", "⚠️".yellow(), e);
                }
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.driver.is_some()
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let Some(driver) = self.driver.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                log::warn!("browser session dropped without close; closing in background");
                handle.spawn(async move {
                    if let Err(e) = driver.close().await {
                        log::warn!("background browser close failed: {:#}", e);
                    }
                });
            }
            Err(_) => log::error!("browser session dropped outside a runtime; browser left open"),
        }
    }
}
