//! Form driving: bring a fresh browser session to a rendered results page.
//!
//! The flow is strictly sequential with a settle interval after every
//! simulated action: the target form is reactive and needs time to process
//! synthetic events before the next interaction is valid. City selection
//! failures abort the search; date selection is explicitly non-fatal.

use std::time::Duration;

use crate::model::SearchRequest;
use crate::selectors;
use chrono::Datelike;
use farescout_common::{Result, ScoutError};
use farescout_config::{SearchConfig, WebDriverConfig};
use farescout_driver::scout_browser::driver::ScoutDriver;
use farescout_driver::scout_browser::page::{Key, ScoutElement, ScoutPage, WaitError};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Sets an input's value directly and fires the synthetic events the page's
/// reactive framework listens for. Returns false when the selector is
/// absent, so the caller can fall back to keystroke typing.
const SET_VALUE_SCRIPT: &str = r#"
const el = document.querySelector(arguments[0]);
if (!el) return false;
el.focus();
el.value = arguments[1];
el.dispatchEvent(new Event('input', { bubbles: true }));
el.dispatchEvent(new Event('change', { bubbles: true }));
const key = arguments[1].length ? arguments[1][0] : '';
el.dispatchEvent(new KeyboardEvent('keydown', { bubbles: true, cancelable: true, key: key }));
el.dispatchEvent(new KeyboardEvent('keyup', { bubbles: true, cancelable: true, key: key }));
return true;
"#;

/// Snapshot of the rendered results page, taken just before teardown.
#[derive(Debug, Clone)]
pub struct CapturedPage {
    pub html: String,
    /// Content hash of the capture, for log correlation across a run.
    pub checksum: String,
}

/// Drives the search form for one request on one dedicated session.
pub struct FormDriver<'a> {
    webdriver: &'a WebDriverConfig,
    search: &'a SearchConfig,
}

impl<'a> FormDriver<'a> {
    pub fn new(webdriver: &'a WebDriverConfig, search: &'a SearchConfig) -> Self {
        Self { webdriver, search }
    }

    /// Run the full form flow and capture the results page.
    ///
    /// The browser session is torn down unconditionally, success or failure.
    pub async fn run(&self, request: &SearchRequest) -> Result<CapturedPage> {
        let driver = ScoutDriver::connect(&self.webdriver.endpoint, self.webdriver.headless)
            .await
            .map_err(ScoutError::Driver)?;

        let outcome = self.drive(&driver, request).await;

        if let Err(err) = driver.close().await {
            warn!(%err, "browser session close failed");
        }
        outcome
    }

    async fn drive(&self, driver: &ScoutDriver, request: &SearchRequest) -> Result<CapturedPage> {
        let cfg = self.search;

        let page = driver
            .open(&cfg.target_url, Duration::from_secs(cfg.page_load_timeout_secs))
            .await
            .map_err(ScoutError::Driver)?;
        info!(url = %cfg.target_url, "target page loaded");

        self.select_city(&page, selectors::ORIGIN_INPUT, &request.origin, "origin")
            .await?;
        page.settle(ms(cfg.field_gap_ms)).await;

        self.select_city(
            &page,
            selectors::DESTINATION_INPUT,
            &request.destination,
            "destination",
        )
        .await?;
        page.settle(ms(cfg.field_gap_ms)).await;

        // Non-fatal: the flow continues with whatever date the form holds.
        if let Err(err) = self.select_date(&page, request.journey_date.day()).await {
            warn!(%err, "journey date selection failed; continuing");
        }
        page.settle(ms(cfg.pre_submit_settle_ms)).await;

        self.submit(&page).await?;
        page.settle(ms(cfg.results_settle_ms)).await;

        let html = page.source().await.map_err(ScoutError::Driver)?;
        let checksum = blake3::hash(html.as_bytes()).to_hex().to_string();
        debug!(bytes = html.len(), %checksum, "captured results page");
        Ok(CapturedPage { html, checksum })
    }

    /// Fill one city field and confirm its autocomplete selection.
    async fn select_city(
        &self,
        page: &ScoutPage,
        selector: &'static str,
        city: &str,
        field: &'static str,
    ) -> Result<()> {
        info!(field, city, "selecting city");

        let input = page
            .wait_for(selector, secs(self.search.city_selector_timeout_secs))
            .await
            .map_err(wait_err(field))?;

        self.fill_and_pick(page, &input, selector, city)
            .await
            .map_err(|err| {
                warn!(field, %err, "city selection protocol failed");
                ScoutError::Selection { field }
            })
    }

    async fn fill_and_pick(
        &self,
        page: &ScoutPage,
        input: &ScoutElement,
        selector: &str,
        city: &str,
    ) -> anyhow::Result<()> {
        let cfg = self.search;

        if !self.inject_value(page, selector, city).await {
            debug!(selector, "value injection rejected; typing fallback");
            input.click().await?;
            input.clear().await?;
            input.type_text(city, ms(cfg.keystroke_delay_ms)).await?;
        }

        // Let the suggestion list populate, then take the first entry.
        page.settle(ms(cfg.suggestion_settle_ms)).await;
        input.press(Key::Down).await?;
        page.settle(ms(cfg.highlight_settle_ms)).await;
        input.press(Key::Enter).await?;

        // Let the picked suggestion propagate into the form state.
        page.settle(ms(cfg.selection_settle_ms)).await;
        Ok(())
    }

    /// Direct DOM write plus synthetic events; true means the page accepted it.
    async fn inject_value(&self, page: &ScoutPage, selector: &str, value: &str) -> bool {
        match page
            .execute(SET_VALUE_SCRIPT, vec![json!(selector), json!(value)])
            .await
        {
            Ok(Value::Bool(accepted)) => accepted,
            Ok(other) => {
                debug!(selector, ?other, "unexpected injection script result");
                false
            }
            Err(err) => {
                debug!(selector, %err, "value injection script failed");
                false
            }
        }
    }

    /// Open the date picker and click the cell for `day`.
    async fn select_date(&self, page: &ScoutPage, day: u32) -> anyhow::Result<()> {
        let cfg = self.search;
        info!(day, "selecting journey date");

        let trigger = page
            .wait_for(selectors::DATE_TRIGGER, secs(cfg.date_trigger_timeout_secs))
            .await?;
        trigger.click().await?;
        page.settle(ms(cfg.calendar_settle_ms)).await;

        let cell_selector = selectors::day_cell(day);
        page.wait_for(&cell_selector, secs(cfg.date_cell_timeout_secs))
            .await?;

        let cells = page.find_all(&cell_selector).await?;
        let cell = cells
            .first()
            .ok_or_else(|| anyhow::anyhow!("no enabled calendar cell for day {day}"))?;
        cell.click().await?;
        page.settle(ms(cfg.post_date_settle_ms)).await;

        debug!(day, "journey date selected");
        Ok(())
    }

    async fn submit(&self, page: &ScoutPage) -> Result<()> {
        let button = page
            .wait_for(selectors::SUBMIT_BUTTON, secs(self.search.submit_timeout_secs))
            .await
            .map_err(wait_err("submit"))?;
        button.click().await.map_err(ScoutError::Driver)?;
        info!("search submitted; waiting for results to render");
        Ok(())
    }
}

fn wait_err(field: &'static str) -> impl FnOnce(WaitError) -> ScoutError {
    move |err| match err {
        WaitError::TimedOut(selector) => ScoutError::SelectorTimeout { field, selector },
        WaitError::Driver(err) => ScoutError::Driver(err),
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn secs(secs: u64) -> Duration {
    Duration::from_secs(secs)
}
