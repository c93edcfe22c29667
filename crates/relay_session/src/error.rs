use derive_more::{Display, Error};

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum SessionErrorKind {
    #[display("Tool not found: {_0}")]
    ToolNotFound(String),
    #[display("Unknown session: {_0}")]
    UnknownSession(String),
    #[display("operation timed out")]
    OperationTimeout,
    /// The session's id was rejected by the server after a prior successful
    /// init; the session is marked disconnected so the next health check (or
    /// `add_server`) can re-establish it.
    #[display("session expired: {_0}")]
    SessionExpired(String),
    /// A transport-level failure that isn't a crash or a timeout: a tool
    /// reporting `isError`, a malformed response, or a failed connect.
    /// Carries the real error text through rather than masquerading as
    /// `ToolNotFound`.
    #[display("{_0}")]
    Other(String),
}

#[derive(Debug, Display, Error)]
#[display("{kind} ({file}:{line})")]
pub struct SessionError {
    kind: SessionErrorKind,
    line: u32,
    file: &'static str,
}

impl SessionError {
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    pub fn kind(&self) -> &SessionErrorKind {
        &self.kind
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
