//! Resilient chat-completion HTTP client: retry/backoff plus normalization
//! of provider errors embedded in otherwise-successful responses.

mod client;
mod config;
mod embedded_error;
mod error;
mod retry;

pub use client::{
    ChatCompletionChoice, ChatCompletionRequest, ChatCompletionResponse, CompletionBackend,
    ResilientHttpClient,
};
pub use config::ResilientHttpClientConfig;
pub use embedded_error::{EmbeddedError, find_embedded_error};
pub use error::{HttpClientError, HttpClientErrorKind, HttpClientResult};
pub use retry::{MAX_RETRIES, retry_with_backoff};
