use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{ChatError, MissingSetting};
use crate::core::think::ReasoningMarkers;
use crate::utils::url::normalize_base_url;

pub const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the OpenAI-compatible API, e.g. `https://api.openai.com/v1`
    pub api_endpoint: Option<String>,
    pub api_key: Option<String>,
    pub selected_model: Option<String>,
    /// UI theme name ("light" or "dark")
    pub theme: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Lay out assistant replies as markdown
    pub markdown: Option<bool>,
    /// Override the markers that delimit model reasoning
    pub reasoning_open_tag: Option<String>,
    pub reasoning_close_tag: Option<String>,
}

/// Validated settings needed to send a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub markers: ReasoningMarkers,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn api_endpoint(&self) -> String {
        match &self.api_endpoint {
            Some(endpoint) => normalize_base_url(endpoint),
            None => DEFAULT_API_ENDPOINT.to_string(),
        }
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn markdown_enabled(&self) -> bool {
        self.markdown.unwrap_or(true)
    }

    pub fn reasoning_markers(&self) -> ReasoningMarkers {
        let defaults = ReasoningMarkers::default();
        ReasoningMarkers::new(
            non_empty(&self.reasoning_open_tag).unwrap_or(defaults.open.as_str()),
            non_empty(&self.reasoning_close_tag).unwrap_or(defaults.close.as_str()),
        )
    }

    /// Fill an unset credential or endpoint from the environment.
    pub fn apply_env_fallback(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if non_empty(&self.api_key).is_none() {
            if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
                self.api_key = Some(key);
            }
        }
        if self.api_endpoint.is_none() {
            if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
                self.api_endpoint = Some(url);
            }
        }
    }

    /// Check that endpoint, credential and model are all present.
    pub fn connection_settings(&self) -> Result<ConnectionSettings, ChatError> {
        let base_url = self.api_endpoint();
        if base_url.is_empty() {
            return Err(ChatError::Configuration(MissingSetting::Endpoint));
        }
        let api_key = non_empty(&self.api_key)
            .ok_or(ChatError::Configuration(MissingSetting::ApiKey))?
            .to_string();
        let model = non_empty(&self.selected_model)
            .ok_or(ChatError::Configuration(MissingSetting::Model))?
            .to_string();

        Ok(ConnectionSettings {
            base_url,
            api_key,
            model,
            max_tokens: self.max_tokens(),
            temperature: self.temperature(),
            markers: self.reasoning_markers(),
        })
    }

    /// Whether endpoint and credential are set, which is enough to list models.
    pub fn has_credentials(&self) -> bool {
        !self.api_endpoint().is_empty() && non_empty(&self.api_key).is_some()
    }
}

/// Show a key without revealing it: first four characters and the length.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}… ({} chars)", secret.chars().count())
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
