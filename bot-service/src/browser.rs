use berner_core::CoreResult;
use std::path::PathBuf;
use tracing::{info, warn};

pub trait BrowserLauncher {
    fn open(&self, url: &str) -> CoreResult<()>;
}

/// Opens URLs in the platform's default browser, falling back to a configured
/// browser executable.
pub struct SystemBrowser {
    fallback: Option<PathBuf>,
}

impl SystemBrowser {
    pub fn new(fallback: Option<PathBuf>) -> Self {
        Self { fallback }
    }
}

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> CoreResult<()> {
        let error = match open::that_detached(url) {
            Ok(()) => {
                info!("Opened authorization page in the default browser");
                return Ok(());
            }
            Err(e) => e,
        };

        match &self.fallback {
            Some(browser) => {
                warn!(
                    "Default browser unavailable ({}), trying {}",
                    error,
                    browser.display()
                );
                open::with_detached(url, browser.to_string_lossy())?;
                Ok(())
            }
            None => Err(error.into()),
        }
    }
}
