use derive_more::{Display, Error};
use relay_http::HttpClientError;

#[derive(Debug, Display)]
pub enum ChatErrorKind {
    #[display("completion request failed: {_0}")]
    Http(HttpClientError),
    #[display("hook returned an error: {_0}")]
    HookFailed(String),
    #[display("exceeded max_iterations ({_0})")]
    MaxIterationsExceeded(usize),
    #[display("completion response had no choices")]
    EmptyResponse,
}

#[derive(Debug, Display, Error)]
#[display("{kind} ({file}:{line})")]
pub struct ChatError {
    kind: ChatErrorKind,
    line: u32,
    file: &'static str,
}

impl ChatError {
    #[track_caller]
    pub fn new(kind: ChatErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    pub fn kind(&self) -> &ChatErrorKind {
        &self.kind
    }

    #[track_caller]
    pub(crate) fn from_http(err: HttpClientError) -> Self {
        Self::new(ChatErrorKind::Http(err))
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
