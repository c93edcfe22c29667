//! MCP session transports: one actor over a spawned child process speaking
//! line-delimited JSON-RPC, one actor over HTTP with session cookies and
//! SSE-framed replies. Both expose the same [`SessionTransport`] surface so
//! callers never need to know which one they're talking to.

mod error;
mod http_session;
mod protocol;
mod session;
mod stdio;

pub use error::{TransportError, TransportErrorKind, TransportResult};
pub use http_session::HttpSessionConfig;
pub use session::SessionTransport;
pub use stdio::StdioSessionConfig;
