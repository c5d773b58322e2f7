//! OpenAI-compatible chat-completions provider.
//!
//! Works against api.openai.com by default; any endpoint speaking the
//! `/v1/chat/completions` shape (Groq, a local proxy) is reachable via
//! [`OpenAiConfig::with_base_url`].

use std::{env, fmt, time::Duration};

use async_trait::async_trait;
use hyper::body::to_bytes;
use hyper::header::{AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Request, Uri};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;

use crate::http_client::{HttpsClient, build_https_client};
use crate::traits::{
    AdapterError, AdapterResult, ChatMessage, ChatModel, ChatRequest, ModelMetadata,
};

/// Environment variable used when loading configuration automatically.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuration for the OpenAI-compatible provider.
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
    default_temperature: Option<f32>,
}

impl OpenAiConfig {
    /// Creates a configuration using the supplied model identifier.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            base_url: "https://api.openai.com/".to_owned(),
            timeout: Duration::from_secs(60),
            default_temperature: None,
        }
    }

    /// Loads the API key from the `OPENAI_API_KEY` environment variable.
    #[must_use]
    pub fn from_env(model: impl Into<String>) -> Self {
        let mut cfg = Self::new(model);
        cfg.api_key = env::var(OPENAI_API_KEY_ENV).ok();
        cfg
    }

    /// Overrides the base URL used for API calls.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url(base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the default sampling temperature used when requests omit it.
    #[must_use]
    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = Some(temperature);
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supplies an explicit API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Chat model backed by an OpenAI-compatible HTTPS endpoint.
pub struct OpenAiChatModel {
    client: HttpsClient,
    endpoint: Uri,
    metadata: ModelMetadata,
    api_key: String,
    timeout: Duration,
    default_temperature: Option<f32>,
}

impl fmt::Debug for OpenAiChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiChatModel")
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAiChatModel {
    /// Constructs a new provider with the supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the API key is missing or
    /// the endpoint URL is invalid.
    pub fn new(config: OpenAiConfig) -> AdapterResult<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| AdapterError::configuration("chat provider requires an API key"))?;

        let metadata = ModelMetadata::new("openai", config.model.clone());
        let endpoint = format!("{}v1/chat/completions", config.base_url)
            .parse::<Uri>()
            .map_err(|err| AdapterError::configuration(format!("invalid endpoint: {err}")))?;

        let client = build_https_client()?;

        Ok(Self {
            client,
            endpoint,
            metadata,
            api_key,
            timeout: config.timeout,
            default_temperature: config.default_temperature,
        })
    }

    fn build_request(&self, request: &ChatRequest) -> ChatCompletionRequest {
        let messages = request.messages().iter().map(map_message).collect();

        ChatCompletionRequest {
            model: self.metadata.model().to_owned(),
            messages,
            temperature: request.temperature().or(self.default_temperature),
            max_tokens: request.max_output_tokens(),
            stream: false,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    async fn complete(&self, request: ChatRequest) -> AdapterResult<String> {
        let payload = self.build_request(&request);
        let body = serde_json::to_vec(&payload).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode chat request: {err}"))
        })?;

        let request = Request::post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .body(Body::from(body))
            .map_err(|err| AdapterError::transport(format!("failed to build request: {err}")))?;

        debug!(model = self.metadata.model(), "sending chat completion");

        let response = timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| AdapterError::transport("chat completion timed out"))?
            .map_err(|err| AdapterError::transport(format!("chat completion failed: {err}")))?;

        let status = response.status();
        let bytes = to_bytes(response.into_body())
            .await
            .map_err(|err| AdapterError::transport(format!("failed to read response: {err}")))?;

        if status.as_u16() == 429 {
            return Err(AdapterError::RateLimited { retry_after: None });
        }
        if !status.is_success() {
            let reason = String::from_utf8_lossy(&bytes).to_string();
            return Err(AdapterError::response(format!(
                "provider returned {status}: {reason}"
            )));
        }

        let response: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|err| AdapterError::response(format!("failed to decode response: {err}")))?;

        let content = response
            .choices
            .into_iter()
            .find_map(|choice| choice.message.and_then(|message| message.content))
            .unwrap_or_default();

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn map_message(message: &ChatMessage) -> WireMessage {
    WireMessage {
        role: message.role().to_string(),
        content: message.content().to_owned(),
    }
}

fn sanitize_base_url(input: &str) -> AdapterResult<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(AdapterError::configuration(
            "base URL must start with http:// or https://",
        ));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<Uri>()
        .map_err(|err| AdapterError::configuration(format!("invalid base URL: {err}")))?;
    Ok(base)
}
