//! Drives one streaming chat completion: sends the request, feeds the body
//! through the SSE decoder and the reasoning splitter, and reconciles token
//! usage once the stream ends.

use std::time::Instant;

use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{ChatMessage, ChatRequest, ChatResponse, Usage};
use crate::core::error::ChatError;
use crate::core::message::{Role, TokenUsage};
use crate::core::sse::SseDecoder;
use crate::core::think::{ReasoningMarkers, SplitDelta, TagSplitter};
use crate::utils::auth::add_auth_headers;
use crate::utils::url::construct_api_url;

/// Characters per token used when the server never reports usage.
pub const CHARS_PER_TOKEN: u64 = 4;

pub struct StreamParams {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub history: Vec<ChatMessage>,
    pub user_message: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub markers: ReasoningMarkers,
}

/// Cumulative and incremental text after a frame changed the accumulators.
#[derive(Debug, Clone, Copy)]
pub struct StreamProgress<'a> {
    pub visible: &'a str,
    pub reasoning: &'a str,
    pub visible_delta: &'a str,
    pub reasoning_delta: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub enum StreamEvent<'a> {
    /// The server accepted the request and the body is streaming.
    Started,
    Delta(StreamProgress<'a>),
}

/// Everything the stream produced once it finished.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutcome {
    pub visible: String,
    pub reasoning: String,
    pub response_time_ms: u64,
    pub usage: TokenUsage,
    /// The caller cancelled before the server closed the stream.
    pub interrupted: bool,
}

/// Build the request body. Messages with the `system` role are left out of
/// the history; the new user message always goes last.
pub fn build_request(
    model: &str,
    history: &[ChatMessage],
    user_message: &str,
    max_tokens: u32,
    temperature: f32,
) -> ChatRequest {
    let mut messages: Vec<ChatMessage> = history
        .iter()
        .filter(|message| message.role != Role::System.as_str())
        .cloned()
        .collect();
    messages.push(ChatMessage {
        role: Role::User.as_str().to_string(),
        content: user_message.to_string(),
    });

    ChatRequest {
        model: model.to_string(),
        messages,
        max_tokens,
        temperature,
        stream: true,
    }
}

/// `ceil(chars / 4)` over the visible and reasoning text.
pub fn estimate_tokens(visible_chars: usize, reasoning_chars: usize) -> u64 {
    let chars = (visible_chars + reasoning_chars) as u64;
    chars.div_ceil(CHARS_PER_TOKEN)
}

/// Accumulators for one in-flight response.
#[derive(Debug)]
pub struct StreamState {
    visible: String,
    reasoning: String,
    splitter: TagSplitter,
    usage: Option<Usage>,
}

impl StreamState {
    pub fn new(markers: ReasoningMarkers) -> Self {
        Self {
            visible: String::new(),
            reasoning: String::new(),
            splitter: TagSplitter::new(markers),
            usage: None,
        }
    }

    pub fn visible(&self) -> &str {
        &self.visible
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Fold one decoded frame into the state and return the text it added.
    pub fn apply(&mut self, frame: &ChatResponse) -> SplitDelta {
        let delta = match frame.content_delta() {
            Some(content) => self.splitter.push(content),
            None => SplitDelta::default(),
        };
        self.visible.push_str(&delta.visible);
        self.reasoning.push_str(&delta.reasoning);

        // Later usage frames replace earlier ones: some servers only fill
        // usage on the final frame.
        if let Some(usage) = frame.usage {
            self.usage = Some(usage);
        }

        delta
    }

    /// Release any held-back marker residue.
    fn flush(&mut self) -> SplitDelta {
        let delta = self.splitter.finish();
        self.visible.push_str(&delta.visible);
        self.reasoning.push_str(&delta.reasoning);
        delta
    }

    fn progress<'a>(&'a self, delta: &'a SplitDelta) -> StreamProgress<'a> {
        StreamProgress {
            visible: &self.visible,
            reasoning: &self.reasoning,
            visible_delta: &delta.visible,
            reasoning_delta: &delta.reasoning,
        }
    }

    /// Resolve token counts, estimating when the server reported none.
    pub fn token_usage(&self) -> TokenUsage {
        let reported = self.usage.unwrap_or_default();
        let total = reported.total_tokens.unwrap_or(0);
        if total > 0 {
            return TokenUsage {
                total,
                prompt: reported.prompt_tokens,
                completion: reported.completion_tokens,
                estimated: false,
            };
        }

        TokenUsage {
            total: estimate_tokens(self.visible.chars().count(), self.reasoning.chars().count()),
            prompt: reported.prompt_tokens,
            completion: reported.completion_tokens,
            estimated: true,
        }
    }

    pub fn finish(self, response_time_ms: u64, interrupted: bool) -> CompletionOutcome {
        let usage = self.token_usage();
        CompletionOutcome {
            visible: self.visible,
            reasoning: self.reasoning,
            response_time_ms,
            usage,
            interrupted,
        }
    }
}

/// Read a response body to completion, updating `state` and reporting every
/// change through `on_event`. Returns `true` when cancelled early.
pub async fn consume_body<S, B, E, F>(
    mut body: S,
    state: &mut StreamState,
    cancel: &CancellationToken,
    on_event: &mut F,
) -> Result<bool, ChatError>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
    F: FnMut(StreamEvent<'_>),
{
    let mut decoder = SseDecoder::new();
    let mut frames_seen = 0usize;

    let interrupted = loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break true,
            next = body.next() => next,
        };

        let chunk = match next {
            Some(Ok(chunk)) => chunk,
            Some(Err(err)) => {
                debug!(error = %err, frames_seen, "Stream body failed");
                return Err(ChatError::network(err));
            }
            None => break false,
        };

        for frame in decoder.push::<ChatResponse>(chunk.as_ref()) {
            frames_seen += 1;
            let delta = state.apply(&frame);
            if !delta.is_empty() {
                on_event(StreamEvent::Delta(state.progress(&delta)));
            }
        }
    };
    decoder.finish();

    let tail = state.flush();
    if !tail.is_empty() {
        on_event(StreamEvent::Delta(state.progress(&tail)));
    }

    debug!(frames_seen, interrupted, "Stream body finished");
    Ok(interrupted)
}

/// Perform one streaming completion request.
///
/// A non-success status fails before any event is emitted. Cancelling before
/// the response headers arrive yields an empty interrupted outcome and no
/// events. The response body
/// is dropped on every return path, releasing the connection.
pub async fn stream_completion<F>(
    params: StreamParams,
    cancel: CancellationToken,
    mut on_event: F,
) -> Result<CompletionOutcome, ChatError>
where
    F: FnMut(StreamEvent<'_>),
{
    let StreamParams {
        client,
        base_url,
        api_key,
        model,
        history,
        user_message,
        max_tokens,
        temperature,
        markers,
    } = params;

    let started = Instant::now();
    let request = build_request(&model, &history, &user_message, max_tokens, temperature);
    let chat_url = construct_api_url(&base_url, "chat/completions");
    debug!(
        url = %chat_url,
        model = %model,
        messages = request.messages.len(),
        "Sending chat completion request"
    );

    let http_request = client
        .post(chat_url)
        .header("Content-Type", "application/json");
    let mut state = StreamState::new(markers);
    let pending = add_auth_headers(http_request, &api_key).json(&request).send();
    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Cancelled before the server answered");
            return Ok(state.finish(started.elapsed().as_millis() as u64, true));
        }
        response = pending => response.map_err(ChatError::network)?,
    };

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        debug!(status = status.as_u16(), "Chat completion rejected");
        return Err(ChatError::http_status(status.as_u16(), &error_text));
    }

    on_event(StreamEvent::Started);

    let interrupted = consume_body(response.bytes_stream(), &mut state, &cancel, &mut on_event).await?;

    let response_time_ms = started.elapsed().as_millis() as u64;
    Ok(state.finish(response_time_ms, interrupted))
}
