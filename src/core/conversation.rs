//! Ordered list of the messages exchanged in the active session.

use crate::api::ChatMessage;
use crate::core::chat_stream::CompletionOutcome;
use crate::core::message::{Message, Role};

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// History in request form: role and visible content only.
    pub fn api_history(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .filter(|message| !message.is_streaming)
            .map(|message| ChatMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
            })
            .collect()
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::user(content))
    }

    pub fn push_system(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::system(content))
    }

    pub fn push_error(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::assistant_error(content))
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Start the assistant message that the stream will fill in.
    pub fn begin_assistant(&mut self, model: Option<String>) {
        self.messages.push(Message::streaming_assistant(model));
    }

    fn streaming_mut(&mut self) -> Option<&mut Message> {
        self.messages
            .last_mut()
            .filter(|message| message.is_streaming)
    }

    pub fn has_streaming(&self) -> bool {
        self.messages.last().is_some_and(|message| message.is_streaming)
    }

    /// Replace the streaming message text with the latest cumulative text.
    /// Does nothing once the message has been finalized.
    pub fn update_streaming(&mut self, visible: &str, reasoning: &str) {
        if let Some(message) = self.streaming_mut() {
            message.content.clear();
            message.content.push_str(visible);
            message.reasoning = (!reasoning.is_empty()).then(|| reasoning.to_string());
        }
    }

    /// Finalize the streaming message with the completed outcome.
    pub fn finalize_streaming(&mut self, outcome: &CompletionOutcome) -> Option<&Message> {
        let message = self.streaming_mut()?;
        message.content = outcome.visible.clone();
        message.reasoning = (!outcome.reasoning.is_empty()).then(|| outcome.reasoning.clone());
        message.token_count = Some(outcome.usage.total);
        message.response_time_ms = Some(outcome.response_time_ms);
        message.prompt_tokens = outcome.usage.prompt;
        message.completion_tokens = outcome.usage.completion;
        message.is_streaming = false;
        Some(&*message)
    }

    /// Finalize the streaming message as failed, keeping whatever text had
    /// already arrived.
    pub fn fail_streaming(&mut self, error: &str) -> Option<&Message> {
        let message = self.streaming_mut()?;
        if message.content.is_empty() {
            message.content = format!("Error: {error}");
        } else {
            message.content.push_str(&format!("\n\nError: {error}"));
        }
        message.is_error = true;
        message.is_streaming = false;
        Some(&*message)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn count_by_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::TokenUsage;

    fn outcome(visible: &str, reasoning: &str) -> CompletionOutcome {
        CompletionOutcome {
            visible: visible.to_string(),
            reasoning: reasoning.to_string(),
            response_time_ms: 1200,
            usage: TokenUsage {
                total: 30,
                prompt: Some(10),
                completion: Some(20),
                estimated: false,
            },
            interrupted: false,
        }
    }

    #[test]
    fn api_history_strips_metadata_and_streaming_tail() {
        let mut conversation = Conversation::new();
        conversation.push_system("be brief");
        conversation.push_user("hi");
        conversation.begin_assistant(Some("m".to_string()));
        conversation.update_streaming("hel", "");

        let history = conversation.api_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "system");
        assert_eq!(history[1].content, "hi");
    }

    #[test]
    fn streaming_message_is_finalized_once() {
        let mut conversation = Conversation::new();
        conversation.push_user("q");
        conversation.begin_assistant(Some("m".to_string()));
        conversation.update_streaming("partial", "thinking");
        assert!(conversation.has_streaming());

        let message = conversation
            .finalize_streaming(&outcome("full answer", "thinking more"))
            .expect("streaming message");
        assert_eq!(message.content, "full answer");
        assert_eq!(message.reasoning.as_deref(), Some("thinking more"));
        assert_eq!(message.token_count, Some(30));
        assert_eq!(message.response_time_ms, Some(1200));
        assert!(!message.is_streaming);

        conversation.update_streaming("ignored", "");
        assert!(conversation.finalize_streaming(&outcome("again", "")).is_none());
        assert_eq!(conversation.last().unwrap().content, "full answer");
    }

    #[test]
    fn failed_stream_keeps_partial_text() {
        let mut conversation = Conversation::new();
        conversation.begin_assistant(None);
        conversation.update_streaming("half an ans", "");
        let message = conversation.fail_streaming("connection reset").unwrap();
        assert!(message.is_error);
        assert!(message.content.starts_with("half an ans"));
        assert!(message.content.ends_with("Error: connection reset"));
        assert_eq!(message.token_count, None);
        assert_eq!(message.response_time_ms, None);
    }

    #[test]
    fn clear_removes_everything() {
        let mut conversation = Conversation::new();
        conversation.push_user("a");
        conversation.push_error("Error: boom");
        assert_eq!(conversation.count_by_role(Role::Assistant), 1);
        conversation.clear();
        assert!(conversation.is_empty());
    }
}
