//! OpenRouter chat completions provider.
//!
//! Speaks the OpenAI-compatible `/chat/completions` API with OpenRouter's
//! attribution headers. Transport errors and 5xx are retried with
//! exponential backoff; 429 and other 4xx fail immediately. A
//! [`CircuitBreaker`] short-circuits calls after repeated transport failures
//! that exhausted their retries.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::llms::base_llm::{ChatCompletion, ChatRequest};
use crate::utilities::circuit_breaker::CircuitBreaker;
use crate::utilities::config::{AppConfig, DEFAULT_MODEL, OPENROUTER_DEFAULT_BASE_URL};
use crate::utilities::errors::LlmError;

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// OpenRouter client.
#[derive(Debug)]
pub struct OpenRouterCompletion {
    api_key: String,
    base_url: String,
    default_model: String,
    http_referer: Option<String>,
    x_title: Option<String>,
    max_retries: u32,
    retry_delay: Duration,
    client: reqwest::Client,
    breaker: CircuitBreaker,
}

impl OpenRouterCompletion {
    pub fn new(api_key: impl Into<String>, default_model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: OPENROUTER_DEFAULT_BASE_URL.to_string(),
            default_model: default_model.into(),
            http_referer: None,
            x_title: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            client,
            breaker: CircuitBreaker::default(),
        })
    }

    /// Client for the dynamic (chat) model.
    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        let mut provider = Self::new(config.api_key.clone(), config.model_dynamic.clone())?
            .with_base_url(config.base_url.clone());
        provider.http_referer = Some(config.http_referer.clone());
        provider.x_title = Some(config.x_title.clone());
        Ok(provider)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_breaker(mut self, breaker: CircuitBreaker) -> Self {
        self.breaker = breaker;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// JSON body for `/chat/completions`.
    pub fn build_request_body(&self, request: &ChatRequest) -> Value {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let model = if model.is_empty() { DEFAULT_MODEL } else { model };

        let mut body = json!({
            "model": model,
            "messages": request.messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });
        if request.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }

    /// Pull `choices[0].message.content` out of a response. `Ok(None)` when
    /// the content is missing or blank.
    pub fn parse_content(response: &Value) -> Result<Option<String>, LlmError> {
        let message = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| LlmError::MalformedResponse("no choices in response".into()))?;

        if let Some((prompt, completion)) = Self::token_usage(response) {
            tracing::debug!(prompt, completion, "OpenRouter token usage");
        }

        Ok(message
            .get("content")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string))
    }

    /// `(prompt, completion)` token counts from the `usage` block, if any.
    /// Missing or non-integer counts read as 0.
    pub fn token_usage(response: &Value) -> Option<(i64, i64)> {
        let usage = response.get("usage")?;
        let count = |key: &str| usage.get(key).and_then(|v| v.as_i64()).unwrap_or(0);
        Some((count("prompt_tokens"), count("completion_tokens")))
    }

    fn status_error(status: reqwest::StatusCode, body: String) -> LlmError {
        match status.as_u16() {
            429 => LlmError::RateLimited,
            401 => LlmError::Unauthorized(body),
            400 => LlmError::BadRequest(body),
            code => LlmError::Upstream { status: code, body },
        }
    }

    async fn send_once(&self, body: &Value) -> Result<Value, LlmError> {
        let mut request = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key));
        if let Some(ref referer) = self.http_referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.x_title {
            request = request.header("X-Title", title);
        }

        let response = request.json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status, text));
        }

        serde_json::from_str(&text).map_err(|e| {
            LlmError::MalformedResponse(format!(
                "{} - Body: {}",
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }

    async fn send_with_retries(&self, body: &Value) -> Result<Value, LlmError> {
        let mut delay = self.retry_delay;
        let mut attempt = 0;
        loop {
            match self.send_once(body).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, ?delay, error = %e, "OpenRouter retry");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenRouterCompletion {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        if !self.breaker.allow() {
            return Err(LlmError::CircuitOpen);
        }

        let body = self.build_request_body(&request);
        tracing::debug!(
            model = %body["model"],
            messages = request.messages.len(),
            json_mode = request.json_mode,
            "OpenRouter completion"
        );

        let response = match self.send_with_retries(&body).await {
            Ok(response) => {
                self.breaker.record_success();
                response
            }
            Err(e) => {
                if e.trips_breaker() {
                    self.breaker.record_failure();
                }
                return Err(e);
            }
        };

        Ok(Self::parse_content(&response)?.unwrap_or_else(|| request.empty_reply()))
    }

    fn provider(&self) -> &str {
        "openrouter"
    }
}
