use derive_more::{Display, Error};

/// Raised while loading or validating configuration.
#[derive(Debug, Display, Error)]
#[display("{message} ({file}:{line})")]
pub struct ConfigError {
    message: String,
    line: u32,
    file: &'static str,
}

impl ConfigError {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
