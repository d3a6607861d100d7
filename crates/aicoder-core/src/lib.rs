//! Apply a natural-language edit instruction to a file through a completion API.
//!
//! [`Editor`] is the entry point. It is generic over [`CompletionService`] so
//! the HTTP client ([`OpenAiClient`]) can be replaced in tests.

mod completion;
mod config;
mod credential;
mod editor;
mod error;
mod openai;
mod request;

pub use completion::{ChatMessage, Completion, CompletionRequest, CompletionService, Role};
pub use config::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, EditorConfig};
pub use credential::{API_KEY_ENV, Credential};
pub use editor::{EditOutcome, Editor};
pub use error::{CoreError, ServiceError};
pub use openai::{DEFAULT_BASE_URL, OpenAiClient};
pub use request::EditRequest;
