use crate::scout_browser::page::ScoutPage;
use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver session.
///
/// Each search acquires its own driver; sessions are never shared or pooled,
/// so request isolation comes from session-per-request rather than locking.
pub struct ScoutDriver {
    client: Client,
}

impl ScoutDriver {
    /// Open a fresh session against a running WebDriver service.
    pub async fn connect(endpoint: &str, headless: bool) -> Result<Self> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();

        let mut args = vec!["--no-sandbox".to_string(), "--disable-dev-shm-usage".to_string()];
        if headless {
            args.push("--headless".to_string());
            args.push("--disable-gpu".to_string());
        }
        chrome_opts.insert("args".to_string(), json!(args));
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(endpoint)
            .await
            .with_context(|| format!("failed to open WebDriver session at {endpoint}"))?;

        debug!(endpoint, headless, "browser session opened");
        Ok(Self { client })
    }

    /// Navigate to `url`, bounding the page load by `load_timeout`, and
    /// return a [`ScoutPage`] over the session.
    pub async fn open(&self, url: &str, load_timeout: Duration) -> Result<ScoutPage> {
        tokio::time::timeout(load_timeout, self.client.goto(url))
            .await
            .with_context(|| format!("page load timed out after {load_timeout:?}: {url}"))?
            .with_context(|| format!("navigation failed: {url}"))?;

        Ok(ScoutPage::new(self.client.clone()))
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
