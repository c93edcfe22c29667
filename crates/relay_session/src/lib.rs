//! Concurrent registry of MCP sessions: aggregates tools across connected
//! servers, routes tool calls to whichever session advertises them, and
//! reconnects on crash or failed health check.

mod config;
mod error;
mod handle;
mod manager;

pub use config::ServerConfig;
pub use error::{SessionError, SessionErrorKind, SessionResult};
pub use handle::SessionManagerHandle;
pub use manager::{DEFAULT_HEALTH_INTERVAL, SessionStatus, SessionSummary};
