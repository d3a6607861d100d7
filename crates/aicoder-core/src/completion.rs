//! The completion service seam.
//!
//! The editor talks to a model through [`CompletionService`], which has one
//! operation. [`OpenAiClient`](crate::OpenAiClient) is the production
//! implementation; tests substitute a scripted double.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::error::ServiceError;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message of the prompt payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A complete request for one completion.
///
/// Serializes to the body of an OpenAI-compatible `chat/completions` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Text produced by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Whether the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A remote model that turns a prompt into text.
pub trait CompletionService {
    /// Submit a single request and wait for its result.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] describing the transport, HTTP, or model
    /// failure. Implementations make exactly one attempt.
    fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<Completion, ServiceError>> + Send;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_serialize_request_as_chat_completion_body() {
        let request = CompletionRequest {
            model: "gpt-4".to_owned(),
            messages: vec![ChatMessage::system("be terse"), ChatMessage::user("hello")],
            temperature: 0.5,
            max_tokens: 4000,
        };

        let value = serde_json::to_value(&request).expect("should serialize");
        assert_eq!(
            value,
            json!({
                "model": "gpt-4",
                "messages": [
                    { "role": "system", "content": "be terse" },
                    { "role": "user", "content": "hello" },
                ],
                "temperature": 0.5,
                "max_tokens": 4000,
            })
        );
    }

    #[test]
    fn test_should_detect_blank_completion() {
        assert!(Completion::new("").is_blank());
        assert!(Completion::new(" \n\t").is_blank());
        assert!(!Completion::new("x = 1\n").is_blank());
    }
}
