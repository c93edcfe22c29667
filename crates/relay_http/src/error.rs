use derive_more::{Display, Error};

/// Statuses retried by [`crate::retry::retry_with_backoff`].
pub const RETRYABLE_STATUSES: [u16; 6] = [429, 500, 502, 503, 504, 508];

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum HttpClientErrorKind {
    /// The connection closed, timed out, was refused, or DNS failed.
    #[display("transport error: {_0}")]
    TransientTransport(String),
    /// A status the endpoint is expected to recover from if retried.
    #[display("transient status {status}: {body}")]
    TransientStatus { status: u16, body: String },
    /// A status that retrying will not fix.
    #[display("fatal status {status}: {body}")]
    FatalStatus { status: u16, body: String },
    /// A 2xx response whose body embeds a provider error.
    #[display("embedded provider error {code}: {message}")]
    EmbeddedProviderError { code: u16, message: String },
    /// The response body could not be parsed as the expected shape.
    #[display("malformed response: {_0}")]
    MalformedResponse(String),
}

impl HttpClientErrorKind {
    /// Whether the retry loop should attempt this request again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransientTransport(_) => true,
            Self::TransientStatus { .. } => true,
            Self::EmbeddedProviderError { code, .. } => {
                RETRYABLE_STATUSES.contains(code) || *code == 502
            }
            Self::FatalStatus { .. } | Self::MalformedResponse(_) => false,
        }
    }

    /// Base backoff delay (before exponential growth) for this error kind.
    pub fn base_backoff(&self) -> std::time::Duration {
        use std::time::Duration;
        match self {
            Self::TransientStatus { status: 429, .. } => Duration::from_secs(5),
            Self::EmbeddedProviderError { code: 429, .. } => Duration::from_secs(5),
            Self::TransientStatus { .. } | Self::EmbeddedProviderError { .. } => {
                Duration::from_secs(2)
            }
            Self::TransientTransport(_) => Duration::from_secs(1),
            Self::FatalStatus { .. } | Self::MalformedResponse(_) => Duration::ZERO,
        }
    }
}

#[derive(Debug, Display, Error)]
#[display("{kind} ({file}:{line})")]
pub struct HttpClientError {
    kind: HttpClientErrorKind,
    line: u32,
    file: &'static str,
}

impl HttpClientError {
    #[track_caller]
    pub fn new(kind: HttpClientErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    pub fn kind(&self) -> &HttpClientErrorKind {
        &self.kind
    }
}

pub type HttpClientResult<T> = Result<T, HttpClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_statuses_are_not_retryable() {
        let kind = HttpClientErrorKind::FatalStatus {
            status: 400,
            body: String::new(),
        };
        assert!(!kind.is_retryable());
    }

    #[test]
    fn retryable_statuses_are_retryable() {
        for status in RETRYABLE_STATUSES {
            let kind = HttpClientErrorKind::TransientStatus {
                status,
                body: String::new(),
            };
            assert!(kind.is_retryable());
        }
    }

    #[test]
    fn embedded_502_is_retryable() {
        let kind = HttpClientErrorKind::EmbeddedProviderError {
            code: 502,
            message: String::new(),
        };
        assert!(kind.is_retryable());
    }
}
