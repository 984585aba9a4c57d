use super::data::{mask_secret, Config, DEFAULT_API_ENDPOINT, ENV_API_KEY, ENV_BASE_URL};
use super::io::ConfigError;
use crate::core::error::{ChatError, MissingSetting};
use std::collections::HashMap;
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.api_endpoint(), DEFAULT_API_ENDPOINT);
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        api_endpoint: Some("http://localhost:11434/v1/".to_string()),
        api_key: Some("sk-local".to_string()),
        selected_model: Some("qwen3:8b".to_string()),
        theme: Some("light".to_string()),
        temperature: Some(0.2),
        ..Default::default()
    };
    config.save_to_path(&config_path).expect("save failed");

    let mut loaded = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(loaded, config);
    assert_eq!(loaded.api_endpoint(), "http://localhost:11434/v1");

    loaded.selected_model = None;
    loaded.save_to_path(&config_path).expect("second save failed");
    let reloaded = Config::load_from_path(&config_path).expect("reload failed");
    assert_eq!(reloaded.selected_model, None);
    assert_eq!(reloaded.theme.as_deref(), Some("light"));
}

#[test]
fn test_invalid_toml_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "api_endpoint = [").expect("write failed");

    match Config::load_from_path(&config_path) {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, config_path),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn connection_settings_require_key_and_model() {
    let mut config = Config::default();
    assert!(matches!(
        config.connection_settings(),
        Err(ChatError::Configuration(MissingSetting::ApiKey))
    ));

    config.api_key = Some("sk".to_string());
    assert!(config.has_credentials());
    assert!(matches!(
        config.connection_settings(),
        Err(ChatError::Configuration(MissingSetting::Model))
    ));

    config.selected_model = Some("gpt-4o-mini".to_string());
    let settings = config.connection_settings().expect("complete config");
    assert_eq!(settings.base_url, DEFAULT_API_ENDPOINT);
    assert_eq!(settings.max_tokens, 1000);
    assert_eq!(settings.markers.open, "<think>");

    config.api_endpoint = Some("  ".to_string());
    assert!(matches!(
        config.connection_settings(),
        Err(ChatError::Configuration(MissingSetting::Endpoint))
    ));
}

#[test]
fn env_fallback_only_fills_unset_values() {
    let mut config = Config::default();
    config.apply_env_fallback(env(&[
        (ENV_API_KEY, "sk-env"),
        (ENV_BASE_URL, "https://example.test/v1"),
    ]));
    assert_eq!(config.api_key.as_deref(), Some("sk-env"));
    assert_eq!(config.api_endpoint.as_deref(), Some("https://example.test/v1"));

    let mut configured = Config {
        api_key: Some("sk-file".to_string()),
        api_endpoint: Some("http://localhost:1234/v1".to_string()),
        ..Default::default()
    };
    configured.apply_env_fallback(env(&[(ENV_API_KEY, "sk-env")]));
    assert_eq!(configured.api_key.as_deref(), Some("sk-file"));
    assert_eq!(
        configured.api_endpoint.as_deref(),
        Some("http://localhost:1234/v1")
    );
}

#[test]
fn custom_reasoning_tags_override_defaults() {
    let config = Config {
        reasoning_open_tag: Some("<reasoning>".to_string()),
        reasoning_close_tag: Some("".to_string()),
        ..Default::default()
    };
    let markers = config.reasoning_markers();
    assert_eq!(markers.open, "<reasoning>");
    assert_eq!(markers.close, "</think>");
}

#[test]
fn secrets_are_masked() {
    assert_eq!(mask_secret("sk-abcdef"), "sk-a… (9 chars)");
}
