//! Loader for farescout configuration with YAML + environment overlays.
//!
//! Precedence: `FARESCOUT_`-prefixed environment variables override the YAML
//! file, which overrides the serde defaults. `${VAR}` placeholders inside
//! string values are expanded (bounded depth, cycles left unresolved) after
//! all sources are merged, so secrets can live in the environment while the
//! file stays checked in.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAX_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level runtime configuration.
///
/// Every field carries a default so the binary runs with no file present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub server: ServerConfig,
    pub webdriver: WebDriverConfig,
    pub search: SearchConfig,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            webdriver: WebDriverConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the axum listener binds to.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".into(),
        }
    }
}

/// Connection settings for the WebDriver service backing each session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebDriverConfig {
    /// WebDriver endpoint (Chromedriver by default).
    pub endpoint: String,
    /// Run the browser without a visible window.
    pub headless: bool,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9515".into(),
            headless: true,
        }
    }
}

/// Target-site settings plus every wait bound and settle interval in the
/// search flow.
///
/// The settle intervals are flat sleeps, not condition waits: the target
/// page's reactive form needs time to process synthetic events before the
/// next interaction is valid. The `*_timeout_secs` values bound the
/// selector-appearance waits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub target_url: String,

    pub page_load_timeout_secs: u64,
    pub city_selector_timeout_secs: u64,
    pub date_trigger_timeout_secs: u64,
    pub date_cell_timeout_secs: u64,
    pub submit_timeout_secs: u64,

    /// Wait for the autocomplete suggestion list to populate.
    pub suggestion_settle_ms: u64,
    /// Wait between the down-arrow and the confirming enter keystroke.
    pub highlight_settle_ms: u64,
    /// Wait for a picked suggestion to propagate into the form state.
    pub selection_settle_ms: u64,
    /// Pause between finishing one field and starting the next.
    pub field_gap_ms: u64,
    /// Wait for the calendar widget to render after opening the picker.
    pub calendar_settle_ms: u64,
    /// Pause after clicking a calendar day cell.
    pub post_date_settle_ms: u64,
    /// Pause before clicking the submit control.
    pub pre_submit_settle_ms: u64,
    /// Wait for network-driven result rendering after submit.
    pub results_settle_ms: u64,
    /// Inter-key delay for the keystroke-by-keystroke typing fallback.
    pub keystroke_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target_url: "https://www.budgetticket.in".into(),
            page_load_timeout_secs: 60,
            city_selector_timeout_secs: 15,
            date_trigger_timeout_secs: 10,
            date_cell_timeout_secs: 5,
            submit_timeout_secs: 10,
            suggestion_settle_ms: 2200,
            highlight_settle_ms: 250,
            selection_settle_ms: 1200,
            field_gap_ms: 500,
            calendar_settle_ms: 1000,
            post_date_settle_ms: 500,
            pre_submit_settle_ms: 1000,
            results_settle_ms: 8000,
            keystroke_delay_ms: 80,
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAX_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML file + env overrides).
pub struct ScoutConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ScoutConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutConfigLoader {
    /// Start with the default sources: `FARESCOUT_` env overrides, nested
    /// keys separated by `__` (e.g. `FARESCOUT_SERVER__BIND_ADDR`).
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("FARESCOUT").separator("__"));
        Self { builder }
    }

    /// Attach a config file; missing files are tolerated so deployments can
    /// rely purely on environment variables.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet; used by tests and doc examples.
    ///
    /// ```
    /// use farescout_config::ScoutConfigLoader;
    ///
    /// let cfg = ScoutConfigLoader::new()
    ///     .with_yaml_str("server:\n  bind_addr: \"127.0.0.1:9100\"")
    ///     .load()
    ///     .expect("valid config");
    /// assert_eq!(cfg.server.bind_addr, "127.0.0.1:9100");
    /// assert_eq!(cfg.search.results_settle_ms, 8000);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders, and deserialize into
    /// the strongly typed config.
    pub fn load(self) -> Result<ScoutConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_apply_with_no_sources() {
        let cfg = ScoutConfigLoader::new().load().expect("defaults load");
        assert_eq!(cfg.webdriver.endpoint, "http://localhost:9515");
        assert!(cfg.webdriver.headless);
        assert_eq!(cfg.search.target_url, "https://www.budgetticket.in");
        assert_eq!(cfg.search.suggestion_settle_ms, 2200);
        assert_eq!(cfg.search.page_load_timeout_secs, 60);
    }

    #[test]
    fn yaml_overrides_defaults() {
        let cfg = ScoutConfigLoader::new()
            .with_yaml_str(
                r#"
webdriver:
  headless: false
search:
  results_settle_ms: 1500
"#,
            )
            .load()
            .unwrap();
        assert!(!cfg.webdriver.headless);
        assert_eq!(cfg.search.results_settle_ms, 1500);
        // untouched siblings keep their defaults
        assert_eq!(cfg.search.keystroke_delay_ms, 80);
    }

    #[test]
    fn env_placeholder_expands_into_strings() {
        temp_env::with_var("SCOUT_TEST_DRIVER", Some("http://driver:4444"), || {
            let cfg = ScoutConfigLoader::new()
                .with_yaml_str("webdriver:\n  endpoint: \"${SCOUT_TEST_DRIVER}\"")
                .load()
                .unwrap();
            assert_eq!(cfg.webdriver.endpoint, "http://driver:4444");
        });
    }

    #[test]
    fn expansion_recurses_across_env_values() {
        temp_env::with_vars(
            [
                ("SCOUT_TEST_HOST", Some("driver.internal")),
                ("SCOUT_TEST_URL", Some("http://${SCOUT_TEST_HOST}:9515")),
            ],
            || {
                let mut v = json!("${SCOUT_TEST_URL}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("http://driver.internal:9515"));
            },
        );
    }

    #[test]
    fn expansion_terminates_on_cycles() {
        temp_env::with_vars(
            [("SCOUT_TEST_A", Some("${SCOUT_TEST_B}")), ("SCOUT_TEST_B", Some("${SCOUT_TEST_A}"))],
            || {
                let mut v = json!("x=${SCOUT_TEST_A}");
                expand_env_in_value(&mut v);
                let s = v.as_str().unwrap();
                assert!(s.starts_with("x="));
                assert!(s.contains("${"));
            },
        );
    }

    #[test]
    fn unknown_placeholders_are_left_as_is() {
        let mut v = json!("endpoint-${SCOUT_TEST_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("endpoint-${SCOUT_TEST_DOES_NOT_EXIST}"));
    }
}
