//! Public surface of the agentic orchestrator: re-exports the pieces from
//! `relay_core`, `relay_http`, `relay_transport`, `relay_session` and
//! `relay_client` that a downstream application actually needs, plus the
//! environment-driven configuration glue none of those crates carry
//! themselves.

mod config;

pub use config::{init_tracing, load_http_config_from_env};

pub use relay_client::{
    ChatError, ChatErrorKind, ChatRequest, ChatResponse, ChatSession, CustomTool, HookOutcome,
    Hooks, NoopHooks, chat,
};
pub use relay_core::{
    ExternalToolSchema, McpToolSchema, Message, Role, ToolCallRequest, ToolSchemaConverter,
};
pub use relay_http::{ResilientHttpClient, ResilientHttpClientConfig};
pub use relay_session::{ServerConfig, SessionManagerHandle, SessionStatus, SessionSummary};
pub use relay_transport::{HttpSessionConfig, StdioSessionConfig};
