use std::collections::HashSet;
use std::sync::Arc;

use relay_http::CompletionBackend;
use relay_session::SessionManagerHandle;
use typed_builder::TypedBuilder;

use crate::custom_tool::CustomTool;
use crate::hooks::{Hooks, NoopHooks};

/// Everything the chat loop needs: the resilient completion client, the MCP
/// session registry, any caller-supplied custom tools, and the hooks that
/// observe each turn.
///
/// `http` is boxed behind [`CompletionBackend`] rather than a concrete
/// client so tests can substitute a fake backend without making real HTTP
/// calls. Construct with `Arc::new(client) as Arc<dyn CompletionBackend>`.
#[derive(TypedBuilder)]
pub struct ChatSession {
    pub(crate) http: Arc<dyn CompletionBackend>,
    pub(crate) sessions: SessionManagerHandle,
    #[builder(default)]
    pub(crate) custom_tools: Vec<CustomTool>,
    #[builder(default)]
    pub(crate) rejected_tool_names: HashSet<String>,
    #[builder(default=Arc::new(NoopHooks) as Arc<dyn Hooks>)]
    pub(crate) hooks: Arc<dyn Hooks>,
    /// Optional safety valve on top of the chat loop's recursion depth;
    /// `None` (the default) leaves it unbounded.
    #[builder(default, setter(strip_option))]
    pub(crate) max_iterations: Option<usize>,
}

impl ChatSession {
    pub fn custom_tool_names(&self) -> impl Iterator<Item = &str> {
        self.custom_tools.iter().map(CustomTool::name)
    }

    pub(crate) fn find_custom_tool(&self, name: &str) -> Option<&CustomTool> {
        self.custom_tools.iter().find(|t| t.name() == name)
    }
}
