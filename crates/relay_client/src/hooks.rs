use async_trait::async_trait;
use relay_core::Message;
use serde_json::Value;

/// What a hook wants the loop to do next.
///
/// `Continue` carries the (possibly unchanged) context forward; `Stop` halts
/// the tool-execution loop immediately after the current tool result is
/// recorded, carrying whatever context the hook last produced.
#[derive(Debug, Clone)]
pub enum HookOutcome {
    Continue(Value),
    Stop(Value),
}

impl HookOutcome {
    pub fn context(&self) -> &Value {
        match self {
            Self::Continue(ctx) | Self::Stop(ctx) => ctx,
        }
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop(_))
    }
}

/// External collaborators the chat loop calls out to. Implementations never
/// see the HTTP or MCP plumbing; they only observe assistant turns and tool
/// results, and may redirect the opaque context threaded between calls.
#[async_trait]
pub trait Hooks: Send + Sync {
    /// Called once per assistant turn, before any of its tool calls (if any)
    /// are executed.
    async fn on_assistant_message(
        &self,
        message: &Message,
        context: Value,
    ) -> Result<HookOutcome, String> {
        let _ = message;
        Ok(HookOutcome::Continue(context))
    }

    /// Called once per tool call, after it has executed (or failed).
    async fn on_tool_result(
        &self,
        tool_call_id: &str,
        tool_name: &str,
        result: &Value,
        context: Value,
    ) -> Result<HookOutcome, String> {
        let _ = (tool_call_id, tool_name, result);
        Ok(HookOutcome::Continue(context))
    }
}

/// A [`Hooks`] implementation that does nothing, for callers that don't need
/// to observe the loop. Costs one dynamic dispatch per call, same as any
/// other `dyn Hooks`, but no further work.
pub struct NoopHooks;

#[async_trait]
impl Hooks for NoopHooks {}
