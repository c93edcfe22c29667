//! The chat loop: drives a multi-turn conversation against a completion
//! endpoint, dispatching any tool calls the model makes against custom
//! tools or the MCP session registry, until the model stops calling tools.

mod chat;
mod chat_session;
mod custom_tool;
mod error;
mod hooks;

pub use chat::{ChatRequest, ChatResponse, chat};
pub use chat_session::ChatSession;
pub use custom_tool::CustomTool;
pub use error::{ChatError, ChatErrorKind, ChatResult};
pub use hooks::{HookOutcome, Hooks, NoopHooks};
