//! The edit workflow.
//!
//! [`Editor::new`] rejects a missing credential before any file access,
//! including the prompt override directory. [`Editor::run`] then performs
//! exactly one edit: resolve and read the target file, render the prompt,
//! make one completion call, and overwrite the file with the returned text.
//! Any failure before the write leaves the file untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use aicoder_pm::{EDIT_SYSTEM_TEMPLATE, EDIT_USER_TEMPLATE, PromptManager};
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::completion::{ChatMessage, CompletionRequest, CompletionService};
use crate::config::EditorConfig;
use crate::credential::Credential;
use crate::error::{CoreError, ServiceError};
use crate::request::EditRequest;

/// Result of a successful edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Absolute path of the rewritten file.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes_written: usize,
}

/// Applies natural-language edit instructions to files.
///
/// # Examples
///
/// ```no_run
/// use aicoder_core::{Credential, EditRequest, Editor, EditorConfig, OpenAiClient};
///
/// # async fn example() -> Result<(), aicoder_core::CoreError> {
/// let config = EditorConfig::builder()
///     .credential(Credential::new("sk-..."))
///     .build();
/// let client = OpenAiClient::new(aicoder_core::DEFAULT_BASE_URL)?;
/// let editor = Editor::new(config, client)?;
///
/// let request = EditRequest::new("./main.py", "add type hints")?;
/// let outcome = editor.run(&request).await?;
/// println!("updated {}", outcome.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Editor<S> {
    config: EditorConfig,
    credential: Credential,
    prompts: PromptManager,
    service: S,
}

impl<S: CompletionService> Editor<S> {
    /// Create an editor that sends its requests to `service`.
    ///
    /// Checks the credential first, then loads the built-in prompts and,
    /// when configured, the override directory.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingCredential` if no credential is configured,
    /// and `CoreError::Prompt` if the override directory cannot be loaded.
    #[instrument(skip_all)]
    pub fn new(config: EditorConfig, service: S) -> Result<Self, CoreError> {
        let credential = config
            .credential()
            .cloned()
            .ok_or(CoreError::MissingCredential)?;

        let mut prompts = PromptManager::new()?;
        if let Some(dir) = config.prompt_dir() {
            prompts.load_dir(dir)?;
            debug!(dir = %dir.display(), "loaded prompt overrides");
        }

        Ok(Self {
            config,
            credential,
            prompts,
            service,
        })
    }

    /// Apply one edit request, overwriting the target file.
    ///
    /// # Errors
    ///
    /// Returns, in the order they are checked:
    /// - `CoreError::FileNotFound` if the path is missing, not a regular
    ///   file, or unreadable as UTF-8 text.
    /// - `CoreError::Prompt` if the prompt templates fail to render.
    /// - `CoreError::Service` if the completion call fails or yields blank text.
    /// - `CoreError::Write` if the file cannot be overwritten.
    #[instrument(skip_all, fields(path = %request.file_path().display()))]
    pub async fn run(&self, request: &EditRequest) -> Result<EditOutcome, CoreError> {
        let path = resolve_target(request.file_path())?;
        let code = fs::read_to_string(&path).map_err(|e| CoreError::FileNotFound {
            path: path.clone(),
            source: Some(e),
        })?;
        debug!(path = %path.display(), bytes = code.len(), "read target file");

        let completion_request = self.build_request(&path, &code, request.instruction())?;
        let completion = self
            .service
            .complete(&self.credential, &completion_request)
            .await?;

        if completion.is_blank() {
            return Err(ServiceError::EmptyCompletion.into());
        }

        write_target(&path, &completion.text)?;
        info!(path = %path.display(), bytes = completion.text.len(), "file updated");

        Ok(EditOutcome {
            path,
            bytes_written: completion.text.len(),
        })
    }

    /// Render the prompt payload for `code` and `instruction`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Prompt` if a template fails to render.
    pub fn build_request(
        &self,
        path: &Path,
        code: &str,
        instruction: &str,
    ) -> Result<CompletionRequest, CoreError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ctx = json!({
            "file_name": file_name,
            "code": code,
            "instructions": instruction,
        });

        let system = self.prompts.render(EDIT_SYSTEM_TEMPLATE, &ctx)?;
        let user = self.prompts.render(EDIT_USER_TEMPLATE, &ctx)?;

        Ok(CompletionRequest {
            model: self.config.model().to_owned(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: self.config.temperature(),
            max_tokens: self.config.max_tokens(),
        })
    }

    /// Returns the completion service.
    pub fn service(&self) -> &S {
        &self.service
    }
}

/// Resolve `path` to an absolute path of an existing regular file.
fn resolve_target(path: &Path) -> Result<PathBuf, CoreError> {
    let resolved = fs::canonicalize(path).map_err(|e| CoreError::FileNotFound {
        path: path.to_path_buf(),
        source: (e.kind() != io::ErrorKind::NotFound).then_some(e),
    })?;

    if !resolved.is_file() {
        return Err(CoreError::FileNotFound {
            path: resolved,
            source: Some(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )),
        });
    }
    Ok(resolved)
}

/// Replace the whole content of `path` with `text`.
fn write_target(path: &Path, text: &str) -> Result<(), CoreError> {
    fs::write(path, text).map_err(|source| CoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
