use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use relay_core::Message;

use crate::config::ResilientHttpClientConfig;
use crate::embedded_error::find_embedded_error;
use crate::error::{HttpClientError, HttpClientErrorKind};
use crate::retry::retry_with_backoff;

/// Body posted to the completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: Message,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatCompletionChoice>,
}

/// Anything that can turn a [`ChatCompletionRequest`] into a response.
///
/// The chat loop depends on this trait rather than [`ResilientHttpClient`]
/// directly so tests can substitute a fake backend without making real HTTP
/// calls, the way the rest of this ecosystem swaps in fakes at a trait seam
/// rather than mocking the transport.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, HttpClientError>;
}

/// A chat-completion client that retries transient failures and normalizes
/// provider errors embedded in 200 response bodies.
#[derive(Debug, Clone)]
pub struct ResilientHttpClient {
    http: reqwest::Client,
    config: ResilientHttpClientConfig,
}

impl ResilientHttpClient {
    pub fn new(config: ResilientHttpClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent().clone())
            .build()
            .expect("reqwest client builder never fails with static config");
        Self { http, config }
    }

    #[tracing::instrument(skip(self, request), fields(model = %request.model))]
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, HttpClientError> {
        retry_with_backoff(|| self.send_once(request)).await
    }

    async fn send_once(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, HttpClientError> {
        let mut builder = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url()))
            .bearer_auth(self.config.api_key())
            .json(request);
        if let Some(title) = self.config.app_title() {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await.map_err(classify_transport_error)?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| HttpClientError::new(HttpClientErrorKind::MalformedResponse(e.to_string())))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        if let Some(embedded) = find_embedded_error(&body) {
            return Err(HttpClientError::new(HttpClientErrorKind::EmbeddedProviderError {
                code: embedded.status,
                message: embedded.message,
            }));
        }

        serde_json::from_value(body)
            .map_err(|e| HttpClientError::new(HttpClientErrorKind::MalformedResponse(e.to_string())))
    }
}

#[async_trait]
impl CompletionBackend for ResilientHttpClient {
    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, HttpClientError> {
        ResilientHttpClient::chat_completion(self, request).await
    }
}

fn status_error(status: StatusCode, body: &Value) -> HttpClientError {
    let code = status.as_u16();
    let body_text = body.to_string();
    let kind = if crate::error::RETRYABLE_STATUSES.contains(&code) {
        HttpClientErrorKind::TransientStatus {
            status: code,
            body: body_text,
        }
    } else {
        HttpClientErrorKind::FatalStatus {
            status: code,
            body: body_text,
        }
    };
    HttpClientError::new(kind)
}

fn classify_transport_error(err: reqwest::Error) -> HttpClientError {
    let description = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connection refused"
    } else if err.is_request() {
        "request error"
    } else {
        "connection closed"
    };
    HttpClientError::new(HttpClientErrorKind::TransientTransport(format!(
        "{description}: {err}"
    )))
}
