use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Path segments appended to a form's endpoint for the intermediate-step callback.
pub const CALLBACK_SEGMENTS: &str = "step/next";

/// Runtime settings shared by every request the engine handles.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Short-circuits every transaction step: nothing is dispatched, the
    /// submission is still recorded.
    pub demo_mode: bool,
    /// Scheme and host prepended to every generated link, e.g. `https://forms.example`.
    /// Empty keeps links relative.
    pub public_url: String,
    /// Path the action endpoints are mounted under.
    pub action_path: String,
    /// Icon used when neither the node nor the form provides one.
    pub default_icon: String,
    pub session_ttl_secs: u64,
    pub session_prefix: String,
    /// Upper bound on one call to the transaction builder.
    pub dispatch_timeout_ms: u64,
    pub action_version: String,
    pub blockchain_ids: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            demo_mode: false,
            public_url: String::new(),
            action_path: "/api/actions".to_string(),
            default_icon: "https://solana.com/src/img/branding/solanaLogoMark.svg".to_string(),
            session_ttl_secs: 30 * 60,
            session_prefix: "formflow:session".to_string(),
            dispatch_timeout_ms: 10_000,
            action_version: "2.1.3".to_string(),
            blockchain_ids: "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp".to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads a JSON config file. Missing keys fall back to their defaults.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    pub fn with_demo_mode(mut self, demo_mode: bool) -> Self {
        self.demo_mode = demo_mode;
        self
    }

    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = public_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl_secs = ttl.as_secs();
        self
    }

    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }

    /// The base endpoint of a form; also the retry target of error envelopes.
    pub fn action_href(&self, form_id: &str) -> String {
        format!(
            "{}{}/{}",
            self.public_url,
            self.action_path,
            urlencoding::encode(form_id)
        )
    }

    /// The base endpoint with the conventional `value` parameter templated in.
    pub fn step_href(&self, form_id: &str) -> String {
        format!("{}?value={{value}}", self.action_href(form_id))
    }

    /// The single-tap endpoint for one choice option.
    pub fn choice_href(&self, form_id: &str, option_value: &str) -> String {
        format!(
            "{}/{}",
            self.action_href(form_id),
            urlencoding::encode(option_value)
        )
    }

    /// The callback a client follows after an intermediate step. It sits one
    /// segment deeper than any choice path, so every option value stays routable.
    pub fn callback_href(&self, form_id: &str) -> String {
        format!("{}/{}", self.action_href(form_id), CALLBACK_SEGMENTS)
    }
}
