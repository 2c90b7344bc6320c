use crate::driver::{BrowserSession, SessionFactory};
use crate::error::HarnessError;
use crate::identity::TestIdentity;
use crate::utils::config::HarnessConfig;

use super::events::{EventSink, HarnessEvent};

/// Create the run's identity and, if possible, its browser session.
///
/// Identity failure aborts the run. A browser that is disabled or fails to
/// launch only leaves the session empty.
pub async fn setup(
    config: &HarnessConfig,
    factory: &dyn SessionFactory,
    sink: &mut dyn EventSink,
) -> Result<(TestIdentity, Option<BrowserSession>), HarnessError> {
    let identity =
        TestIdentity::generate().map_err(|e| HarnessError::Identity(format!("{:#}", e)))?;
    log::info!("test identity {}", identity.address());
    sink.emit(HarnessEvent::IdentityReady {
        address: identity.address().to_string(),
    });

    if !config.browser.enabled {
        sink.emit(HarnessEvent::BrowserUnavailable {
            reason: "disabled by configuration".to_string(),
        });
        return Ok((identity, None));
    }

    let session = match factory.open(&config.browser).await {
        Ok(driver) => {
            sink.emit(HarnessEvent::BrowserReady);
            Some(BrowserSession::new(driver))
        }
        Err(e) => {
            log::warn!("browser unavailable: {:#}", e);
            sink.emit(HarnessEvent::BrowserUnavailable {
                reason: format!("{:#}", e),
            });
            None
        }
    };

    Ok((identity, session))
}
