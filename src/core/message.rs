use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// Token counts attached to a finished assistant message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub total: u64,
    pub prompt: Option<u64>,
    pub completion: Option<u64>,
    /// True when `total` was estimated from text length because the server
    /// never reported usage.
    pub estimated: bool,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub reasoning: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_streaming: bool,
    pub is_error: bool,
    pub token_count: Option<u64>,
    pub response_time_ms: Option<u64>,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub model: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            reasoning: None,
            created_at: Utc::now(),
            is_streaming: false,
            is_error: false,
            token_count: None,
            response_time_ms: None,
            prompt_tokens: None,
            completion_tokens: None,
            model: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn streaming_assistant(model: Option<String>) -> Self {
        Self {
            is_streaming: true,
            model,
            ..Self::new(Role::Assistant, String::new())
        }
    }

    pub fn assistant_error(content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(Role::Assistant, content)
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Tokens per second for this message, when timing data is present.
    pub fn tokens_per_second(&self) -> Option<u64> {
        match (self.token_count, self.response_time_ms) {
            (Some(tokens), Some(ms)) if ms > 0 => {
                Some((tokens as f64 * 1000.0 / ms as f64).round() as u64)
            }
            _ => None,
        }
    }
}
