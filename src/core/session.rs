//! One chat session: configuration, HTTP client, conversation and metrics
//! passed around explicitly instead of living in global state.

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::models::{fetch_models, reconcile_selected_model, sort_models};
use crate::api::ModelInfo;
use crate::core::chat_stream::{stream_completion, StreamEvent, StreamParams};
use crate::core::config::Config;
use crate::core::conversation::Conversation;
use crate::core::error::{ChatError, MissingSetting};
use crate::core::message::Message;
use crate::core::metrics::{MetricsAggregator, MetricsSnapshot};

/// Notice recorded when a request is cancelled before any reply arrived.
pub const CANCELLED_BEFORE_REPLY: &str = "Request cancelled before the model replied.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Not Connected",
            ConnectionStatus::Error => "Connection Error",
        }
    }
}

/// Result of refreshing the model list.
#[derive(Debug, Clone)]
pub struct ModelRefresh {
    /// Models sorted by id for display.
    pub models: Vec<ModelInfo>,
    pub selected: Option<String>,
    /// The selected model changed and the config should be saved.
    pub selection_changed: bool,
}

pub struct Session {
    config: Config,
    client: reqwest::Client,
    conversation: Conversation,
    metrics: MetricsAggregator,
    last_request_failed: bool,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: Config, client: reqwest::Client) -> Self {
        Self {
            config,
            client,
            conversation: Conversation::new(),
            metrics: MetricsAggregator::new(),
            last_request_failed: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        if self.last_request_failed {
            ConnectionStatus::Error
        } else if self.config.has_credentials() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }

    pub fn select_model(&mut self, model: impl Into<String>) {
        self.config.selected_model = Some(model.into());
    }

    /// List the server's models and make sure a valid one is selected.
    pub async fn refresh_models(&mut self) -> Result<ModelRefresh, ChatError> {
        if !self.config.has_credentials() {
            return Err(ChatError::Configuration(MissingSetting::ApiKey));
        }
        let api_key = self.config.api_key.clone().unwrap_or_default();

        let models = match fetch_models(&self.client, &self.config.api_endpoint(), &api_key).await {
            Ok(models) => models,
            Err(err) => {
                warn!(error = %err, "Model refresh failed");
                self.last_request_failed = true;
                return Err(err);
            }
        };
        self.last_request_failed = false;

        let selected = reconcile_selected_model(self.config.selected_model.as_deref(), &models);
        let selection_changed = selected != self.config.selected_model;
        if selection_changed {
            debug!(model = ?selected, "Selected model changed after refresh");
            self.config.selected_model = selected.clone();
        }

        let mut sorted = models;
        sort_models(&mut sorted);
        Ok(ModelRefresh {
            models: sorted,
            selected,
            selection_changed,
        })
    }

    /// Send `input` and stream the reply.
    ///
    /// Missing settings fail before anything is recorded. Otherwise the user
    /// message is recorded, the assistant message is filled in while the
    /// stream runs, and metrics are updated once it completes. Failures leave
    /// an error-flagged assistant message in the conversation. A cancel
    /// before the reply starts leaves a system notice and records no metrics.
    pub async fn send<F>(
        &mut self,
        input: &str,
        cancel: CancellationToken,
        mut on_event: F,
    ) -> Result<&Message, ChatError>
    where
        F: FnMut(StreamEvent<'_>),
    {
        let settings = self.config.connection_settings()?;

        let history = self.conversation.api_history();
        self.conversation.push_user(input);

        let model = settings.model.clone();
        let params = StreamParams {
            client: self.client.clone(),
            base_url: settings.base_url,
            api_key: settings.api_key,
            model: settings.model,
            history,
            user_message: input.to_string(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            markers: settings.markers,
        };

        let conversation = &mut self.conversation;
        let result = stream_completion(params, cancel, |event| {
            match event {
                StreamEvent::Started => conversation.begin_assistant(Some(model.clone())),
                StreamEvent::Delta(progress) => {
                    conversation.update_streaming(progress.visible, progress.reasoning)
                }
            }
            on_event(event);
        })
        .await;

        match result {
            Ok(outcome) if outcome.interrupted && !self.conversation.has_streaming() => {
                debug!("Exchange cancelled before the reply started");
                Ok(self
                    .conversation
                    .push_system(CANCELLED_BEFORE_REPLY))
            }
            Ok(outcome) => {
                self.last_request_failed = false;
                self.metrics
                    .record_exchange(outcome.usage.total, outcome.response_time_ms);
                debug!(
                    tokens = outcome.usage.total,
                    estimated = outcome.usage.estimated,
                    response_time_ms = outcome.response_time_ms,
                    interrupted = outcome.interrupted,
                    "Exchange completed"
                );
                if !self.conversation.has_streaming() {
                    self.conversation.begin_assistant(Some(model));
                }
                self.conversation.finalize_streaming(&outcome);
                self.conversation
                    .last()
                    .ok_or_else(|| ChatError::Format("conversation is empty".to_string()))
            }
            Err(err) => {
                warn!(error = %err, "Exchange failed");
                if matches!(err, ChatError::Transport { .. }) {
                    self.last_request_failed = true;
                }
                if self.conversation.has_streaming() {
                    self.conversation.fail_streaming(&err.to_string());
                } else {
                    self.conversation.push_error(format!("Error: {err}"));
                }
                Err(err)
            }
        }
    }

    /// Drop the conversation and reset metrics together.
    pub fn clear(&mut self) {
        self.conversation.clear();
        self.metrics.reset();
    }
}
