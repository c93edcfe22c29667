use derive_more::{Display, Error};

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connecting to the server (spawning the process / POSTing `initialize`) failed.
    #[display("connect failed: {_0}")]
    ConnectFailed(String),
    /// The session produced a protocol-level fault mid-call: an unparseable
    /// stdio frame, or any other sign the server process is no longer sane.
    #[display("server crashed: {_0}")]
    ServerCrashed(String),
    /// The HTTP session's id was rejected (404) after a prior successful init.
    #[display("session expired")]
    SessionExpired,
    /// A `list_tools`/`call_tool` request exceeded its deadline. The session
    /// is left connected: the server may just be slow.
    #[display("operation timed out after {_0:?}")]
    OperationTimeout(std::time::Duration),
    /// The server reported `isError: true` for a tool call.
    #[display("tool execution failed: {_0}")]
    ToolError(String),
    /// Any other unexpected response shape or status.
    #[display("protocol error: {_0}")]
    Protocol(String),
}

#[derive(Debug, Display, Error)]
#[display("{kind} ({file}:{line})")]
pub struct TransportError {
    kind: TransportErrorKind,
    line: u32,
    file: &'static str,
}

impl TransportError {
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    pub fn kind(&self) -> &TransportErrorKind {
        &self.kind
    }
}

pub type TransportResult<T> = Result<T, TransportError>;
