//! OpenAI-compatible chat completion client.
//!
//! Sends one `POST {base_url}/chat/completions` per call with bearer
//! authentication and turns the response into a [`Completion`] or a
//! [`ServiceError`]. There is no retry.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::completion::{Completion, CompletionRequest, CompletionService};
use crate::credential::Credential;
use crate::error::ServiceError;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const USER_AGENT: &str = concat!("aicoder/", env!("CARGO_PKG_VERSION"));

/// HTTP client for an OpenAI-compatible completion API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Request` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_http(http, base_url))
    }

    /// Create a client around an already configured HTTP client.
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Returns the API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl CompletionService for OpenAiClient {
    #[instrument(skip_all, fields(model = %request.model))]
    async fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> Result<Completion, ServiceError> {
        let url = self.endpoint();
        debug!(url = %url, messages = request.messages.len(), "sending completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(credential.expose())
            .json(request)
            .send()
            .await
            .inspect_err(|e| error!(error = %e, "completion request failed"))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = status_error(status, &body);
            error!(status = status.as_u16(), error = %err, "completion service rejected request");
            return Err(err);
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| ServiceError::Malformed(e.to_string()))?;
        extract_completion(parsed)
    }
}

// ── Wire types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pick the completion text out of a successful response.
///
/// The text is returned untrimmed. Refusals, filtered or truncated output,
/// and blank content are failures.
fn extract_completion(response: ChatCompletionResponse) -> Result<Completion, ServiceError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Malformed("response contained no choices".to_owned()))?;

    match choice.finish_reason.as_deref() {
        Some("content_filter") => {
            return Err(ServiceError::Refused(
                "output blocked by the content filter".to_owned(),
            ));
        }
        Some("length") => return Err(ServiceError::Truncated),
        _ => {}
    }

    let message = choice
        .message
        .ok_or_else(|| ServiceError::Malformed("choice has no message".to_owned()))?;

    if let Some(refusal) = message.refusal {
        return Err(ServiceError::Refused(refusal));
    }

    let completion = Completion::new(message.content.unwrap_or_default());
    if completion.is_blank() {
        return Err(ServiceError::EmptyCompletion);
    }
    Ok(completion)
}

/// Map a non-success HTTP response to a [`ServiceError`].
fn status_error(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("no response body").to_owned()
            } else {
                trimmed.to_owned()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        StatusCode::TOO_MANY_REQUESTS => ServiceError::RateLimited { message },
        _ => ServiceError::Status {
            status: status.as_u16(),
            message,
        },
    }
}
