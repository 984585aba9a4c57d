use serde_json::Value;
use tracing::{debug, warn};

use crate::api::ModelInfo;
use crate::core::error::ChatError;
use crate::utils::auth::add_auth_headers;
use crate::utils::url::construct_api_url;

/// Fetch `GET {base_url}/models`. The response must carry a `data` array;
/// entries without a string `id` are skipped. Server order is preserved.
pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
) -> Result<Vec<ModelInfo>, ChatError> {
    let models_url = construct_api_url(base_url, "models");
    let request = client
        .get(&models_url)
        .header("Content-Type", "application/json");

    let response = add_auth_headers(request, api_key)
        .send()
        .await
        .map_err(ChatError::network)?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ChatError::http_status(status.as_u16(), &error_text));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|err| ChatError::Format(format!("models response is not JSON: {err}")))?;

    let models = parse_models_response(&body)?;
    debug!(url = %models_url, count = models.len(), "Fetched model list");
    Ok(models)
}

/// Validate the `{ data: [...] }` envelope and collect the usable entries.
pub fn parse_models_response(body: &Value) -> Result<Vec<ModelInfo>, ChatError> {
    let entries = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ChatError::Format("expected models array".to_string()))?;

    Ok(entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<ModelInfo>(entry.clone()) {
            Ok(model) if !model.id.is_empty() => Some(model),
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "Skipping model entry without an id");
                None
            }
        })
        .collect())
}

/// Sort models alphabetically by id for display.
pub fn sort_models(models: &mut [ModelInfo]) {
    models.sort_by(|a, b| a.id.cmp(&b.id));
}

/// Decide which model should be selected after a refresh: the current
/// selection if the server still offers it, otherwise the first model the
/// server listed.
pub fn reconcile_selected_model(current: Option<&str>, models: &[ModelInfo]) -> Option<String> {
    if let Some(current) = current {
        if models.iter().any(|model| model.id == current) {
            return Some(current.to_string());
        }
    }
    models.first().map(|model| model.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model(id: &str) -> ModelInfo {
        ModelInfo {
            id: id.to_string(),
            created: None,
            owned_by: None,
        }
    }

    #[test]
    fn parse_rejects_missing_or_non_array_data() {
        for body in [json!({}), json!({"data": {"id": "x"}}), json!([{"id": "x"}])] {
            match parse_models_response(&body) {
                Err(ChatError::Format(_)) => {}
                other => panic!("expected format error, got {other:?}"),
            }
        }
    }

    #[test]
    fn parse_skips_entries_without_id() {
        let body = json!({"data": [{"id": "b"}, {"object": "model"}, {"id": ""}, {"id": "a", "owned_by": "me"}]});
        let models = parse_models_response(&body).unwrap();
        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(models[1].owned_by.as_deref(), Some("me"));
    }

    #[test]
    fn sort_orders_by_id() {
        let mut models = vec![model("gpt-4o"), model("claude"), model("llama3")];
        sort_models(&mut models);
        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["claude", "gpt-4o", "llama3"]);
    }

    #[test]
    fn reconcile_keeps_or_replaces_selection() {
        let models = vec![model("z-first"), model("a-second")];
        assert_eq!(
            reconcile_selected_model(Some("a-second"), &models).as_deref(),
            Some("a-second")
        );
        assert_eq!(
            reconcile_selected_model(Some("gone"), &models).as_deref(),
            Some("z-first")
        );
        assert_eq!(reconcile_selected_model(None, &[]), None);
    }

    #[tokio::test]
    async fn fetch_models_sends_bearer_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [{"id": "qwen3"}, {"id": "deepseek-r1", "created": 1700000000}]
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let models = fetch_models(&client, &format!("{}/v1", server.uri()), "sk-test")
            .await
            .unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[1].created, Some(1_700_000_000));
    }

    #[tokio::test]
    async fn fetch_models_reports_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = fetch_models(&client, &server.uri(), "sk-test")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }
}
