//! Prompt templates for aicoder.
//!
//! [`PromptManager`] ships the built-in edit prompts and lets callers replace
//! them with templates loaded from a directory.

mod error;
mod manager;
mod template;

pub use error::PmError;
pub use manager::{EDIT_SYSTEM_TEMPLATE, EDIT_USER_TEMPLATE, PromptManager};
pub use template::PromptTemplate;
