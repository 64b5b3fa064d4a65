use anyhow::Result;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};

pub use fantoccini::key::Key;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// Failure modes of a bounded selector wait.
///
/// The caller needs to tell "the selector never appeared" apart from session
/// breakage, so the timeout case is split out of the transport error.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("selector `{0}` did not appear within the wait window")]
    TimedOut(String),
    #[error(transparent)]
    Driver(#[from] anyhow::Error),
}

/// Page-level helpers over an open session.
pub struct ScoutPage {
    client: Client,
}

impl ScoutPage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Wait up to `at_most` for `selector` to appear, then return it.
    pub async fn wait_for(
        &self,
        selector: &str,
        at_most: Duration,
    ) -> Result<ScoutElement, WaitError> {
        match self
            .client
            .wait()
            .at_most(at_most)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(element) => Ok(ScoutElement::new(element)),
            Err(CmdError::WaitTimeout) => Err(WaitError::TimedOut(selector.to_string())),
            Err(err) => Err(WaitError::Driver(err.into())),
        }
    }

    /// Find zero or more elements by CSS selector, without waiting.
    pub async fn find_all(&self, selector: &str) -> Result<Vec<ScoutElement>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        Ok(elements.into_iter().map(ScoutElement::new).collect())
    }

    /// Run a script in the page, with `arguments[..]` bound to `args`.
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        self.client
            .execute(script, args)
            .await
            .map_err(anyhow::Error::from)
    }

    /// Return the full page HTML source.
    pub async fn source(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::from)
    }

    /// Flat settle sleep. Not a condition wait: it simply elapses, giving
    /// the page's reactive framework time to process the previous action.
    pub async fn settle(&self, interval: Duration) {
        sleep(interval).await;
    }
}

/// Wrapper for DOM elements providing the interactions the form flow uses.
#[derive(Clone)]
pub struct ScoutElement {
    element: Element,
}

impl ScoutElement {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub async fn click(&self) -> Result<()> {
        self.element.clone().click().await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.element.clone().clear().await?;
        Ok(())
    }

    /// Type `text` keystroke by keystroke with a fixed inter-key delay.
    pub async fn type_text(&self, text: &str, key_delay: Duration) -> Result<()> {
        for ch in text.chars() {
            self.element.send_keys(&ch.to_string()).await?;
            sleep(key_delay).await;
        }
        Ok(())
    }

    /// Send a single control key (arrow, enter, ...) to the element.
    pub async fn press(&self, key: Key) -> Result<()> {
        let ch: char = key.into();
        self.element.send_keys(&ch.to_string()).await?;
        Ok(())
    }
}
