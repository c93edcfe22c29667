//! Shared data model and pure conversion utilities for the orchestrator.
//!
//! Nothing in this crate performs I/O: it defines the message/tool types that
//! flow between the chat loop, the session manager and the HTTP client, plus
//! the stateless functions that translate between MCP and LLM-provider shapes.

mod error;
mod message;
mod role;
mod server_id;
mod tool_call;
mod tool_result;
mod tool_schema;

pub use error::{CoreError, CoreErrorKind};
pub use message::{Message, MessageContent};
pub use role::Role;
pub use server_id::derive_server_id;
pub use tool_call::{ToolCallRequest, parse_tool_arguments};
pub use tool_result::format_tool_result;
pub use tool_schema::{ExternalToolSchema, McpToolSchema, ToolSchemaConverter, openai};
