use derive_more::{Display, Error};

/// Failure categories for the pure conversion/parsing helpers in this crate.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum CoreErrorKind {
    #[display("invalid tool call arguments: {_0}")]
    InvalidArguments(String),
    #[display("malformed tool schema: {_0}")]
    InvalidSchema(String),
}

#[derive(Debug, Display, Error)]
#[display("{kind} ({file}:{line})")]
pub struct CoreError {
    kind: CoreErrorKind,
    line: u32,
    file: &'static str,
}

impl CoreError {
    #[track_caller]
    pub fn new(kind: CoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    pub fn kind(&self) -> &CoreErrorKind {
        &self.kind
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
