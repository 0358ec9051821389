use std::collections::VecDeque;
use std::env;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ModelError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub image_model: String,
    pub timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            model: DEFAULT_CHAT_MODEL.into(),
            image_model: DEFAULT_IMAGE_MODEL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ModelConfig {
    /// Read `OPENAI_*` variables, falling back to defaults.
    ///
    /// A missing or blank `OPENAI_API_KEY` leaves `api_key` unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let base_url = non_empty_var("OPENAI_BASE_URL")?.unwrap_or(defaults.base_url);
        let model = non_empty_var("OPENAI_MODEL")?.unwrap_or(defaults.model);
        let image_model = non_empty_var("OPENAI_IMAGE_MODEL")?.unwrap_or(defaults.image_model);
        let timeout = match env::var("OPENAI_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidSeconds {
                    var: "OPENAI_TIMEOUT_SECS",
                    value: raw,
                })?,
            Err(_) => defaults.timeout,
        };
        Ok(Self {
            base_url,
            api_key,
            model,
            image_model,
            timeout,
        })
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

fn non_empty_var(var: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(var) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(_) => Ok(None),
    }
}

/// The remote model boundary: one prompt in, text (or image bytes) out.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send `prompt` as a single user message and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns `ModelError` when the client is disabled, the request fails,
    /// or the reply carries no content.
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;

    /// Generate one image for `prompt` and return its encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns `ModelError` on any request or download failure.
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ModelError>;
}

/// `ChatModel` backed by an OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: ModelConfig,
}

impl OpenAiClient {
    /// Build a client honouring the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Http` if the HTTP client cannot be constructed.
    pub fn new(config: ModelConfig) -> Result<Self, ModelError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, ModelError> {
        self.config.api_key.as_deref().ok_or(ModelError::Disabled)
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let api_key = self.api_key()?;
        let payload = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        debug!(model = %self.config.model, prompt_len = prompt.len(), "chat completion request");

        let response = self
            .client
            .post(self.config.endpoint("chat/completions"))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ModelError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ModelError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }

    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ModelError> {
        let api_key = self.api_key()?;
        let payload = ImageRequest {
            model: &self.config.image_model,
            prompt,
            n: 1,
            size: "1024x1024",
        };
        debug!(model = %self.config.image_model, "image generation request");

        let response = self
            .client
            .post(self.config.endpoint("images/generations"))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ModelError::HttpStatus(response.status()));
        }

        let body: ImageResponse = response.json().await?;
        let url = body
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or(ModelError::EmptyResponse)?;

        let download = self.client.get(url).send().await?;
        if !download.status().is_success() {
            return Err(ModelError::HttpStatus(download.status()));
        }
        Ok(download.bytes().await?.to_vec())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'static str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

//
// ─── SCRIPTED MODEL ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Failure(StatusCode),
}

/// Deterministic `ChatModel` for tests: serves queued replies in order.
///
/// An exhausted queue answers with `ModelError::EmptyResponse`. Image requests
/// fail unless image bytes were provided.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Scripted>>,
    prompts: Mutex<Vec<String>>,
    image: Option<Vec<u8>>,
}

impl ScriptedModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    #[must_use]
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Scripted::Reply(text.into()));
        self
    }

    /// Queue a failed request.
    #[must_use]
    pub fn failure(self) -> Self {
        self.push(Scripted::Failure(StatusCode::SERVICE_UNAVAILABLE));
        self
    }

    /// Serve these bytes for every image request.
    #[must_use]
    pub fn with_image(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.image = Some(bytes.into());
        self
    }

    /// Prompts received so far, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replies still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn push(&self, entry: Scripted) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(entry);
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());
        let next = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match next {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Failure(status)) => Err(ModelError::HttpStatus(status)),
            None => Err(ModelError::EmptyResponse),
        }
    }

    async fn generate_image(&self, _prompt: &str) -> Result<Vec<u8>, ModelError> {
        self.image.clone().ok_or(ModelError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_model_serves_queue_in_order() {
        let model = ScriptedModel::new().reply("first").failure();
        assert_eq!(model.remaining(), 2);
        assert_eq!(model.complete("p1").await.unwrap(), "first");
        assert_eq!(model.remaining(), 1);
        assert!(matches!(
            model.complete("p2").await,
            Err(ModelError::HttpStatus(status)) if status == StatusCode::SERVICE_UNAVAILABLE
        ));
        assert!(matches!(
            model.complete("p3").await,
            Err(ModelError::EmptyResponse)
        ));
        assert_eq!(model.remaining(), 0);
        assert_eq!(model.prompts(), vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn client_without_key_is_disabled() {
        let client = OpenAiClient::new(ModelConfig::default()).unwrap();
        assert!(!client.enabled());
        assert!(matches!(
            client.complete("hello").await,
            Err(ModelError::Disabled)
        ));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ModelConfig {
            base_url: "http://localhost:8080/v1/".into(),
            ..ModelConfig::default()
        };
        assert_eq!(
            config.endpoint("chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }
}
