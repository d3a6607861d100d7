//! Configuration for the editor.
//!
//! [`EditorConfig`] is assembled by the CLI layer from flags and environment
//! variables. The credential is injected here rather than read by the editor,
//! so tests can run the editor with or without one.

use std::path::{Path, PathBuf};

use typed_builder::TypedBuilder;

use crate::credential::Credential;

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default cap on completion tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Settings for one [`Editor`](crate::Editor).
///
/// # Examples
///
/// ```
/// use aicoder_core::{Credential, EditorConfig};
///
/// let config = EditorConfig::builder()
///     .credential(Credential::new("sk-test"))
///     .model("gpt-4o")
///     .build();
///
/// assert_eq!(config.model(), "gpt-4o");
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct EditorConfig {
    /// API credential; `None` makes `Editor::new` fail with `MissingCredential`.
    #[builder(default, setter(strip_option(fallback = credential_opt)))]
    credential: Option<Credential>,

    /// Model identifier sent with each request.
    #[builder(default = DEFAULT_MODEL.to_owned(), setter(into))]
    model: String,

    /// Sampling temperature.
    #[builder(default = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Max tokens for the completion.
    #[builder(default = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Directory of prompt template overrides.
    #[builder(default, setter(strip_option(fallback = prompt_dir_opt)))]
    prompt_dir: Option<PathBuf>,
}

impl EditorConfig {
    /// Returns the credential, if one was configured.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Returns the completion token cap.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Returns the prompt override directory, if set.
    pub fn prompt_dir(&self) -> Option<&Path> {
        self.prompt_dir.as_deref()
    }
}
