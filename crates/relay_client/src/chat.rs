use std::collections::HashSet;

use futures::future::BoxFuture;
use relay_core::{Message, ToolCallRequest, format_tool_result, parse_tool_arguments};
use relay_http::ChatCompletionRequest;
use serde_json::{Value, json};

use crate::chat_session::ChatSession;
use crate::error::{ChatError, ChatErrorKind};
use crate::hooks::HookOutcome;

/// Input to one top-level [`chat`] call.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
    pub execute_tools: bool,
    pub context: Value,
    pub temperature: Option<f32>,
    pub parallel_tool_calls: Option<bool>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            system_prompt: None,
            execute_tools: true,
            context: json!({}),
            temperature: None,
            parallel_tool_calls: None,
        }
    }
}

/// The terminal result of a [`chat`] call.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub message: Message,
    pub tool_calls_made: Vec<ToolCallRequest>,
    pub stopped_by_hook: bool,
}

/// Drive one conversation to completion: issue a completion request,
/// execute any tool calls the model asked for, reinject results, and
/// recurse until the model stops calling tools (or a hook says to stop).
pub async fn chat(session: &ChatSession, request: ChatRequest) -> Result<ChatResponse, ChatError> {
    let mut messages = request.messages;
    if let Some(system_prompt) = &request.system_prompt {
        if !system_prompt.is_empty() {
            messages.insert(0, Message::system(system_prompt.clone()));
        }
    }

    let tools = available_tools(session).await?;

    run_turn(
        session,
        messages,
        tools,
        &request.model,
        request.execute_tools,
        request.context,
        request.temperature,
        request.parallel_tool_calls,
        Vec::new(),
        0,
    )
    .await
}

async fn available_tools(session: &ChatSession) -> Result<Vec<Value>, ChatError> {
    let mcp_tools = session
        .sessions
        .get_all_tools()
        .await
        .map(|tools| {
            tools
                .into_iter()
                .filter(|t| !session.rejected_tool_names.contains(&t.function.name))
                .filter_map(|t| serde_json::to_value(t).ok())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let custom_tools = session
        .custom_tools
        .iter()
        .filter(|t| !session.rejected_tool_names.contains(t.name()))
        .filter_map(|t| serde_json::to_value(&t.schema).ok());

    Ok(mcp_tools.into_iter().chain(custom_tools).collect())
}

/// Names of every tool offered to the model this turn, whether custom or
/// MCP-routed, so `dispatch` can classify a call without a second round trip
/// to the session manager.
fn known_tool_names(tools: &[Value]) -> HashSet<String> {
    tools
        .iter()
        .filter_map(|t| t.get("function")?.get("name")?.as_str())
        .map(str::to_string)
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn run_turn<'a>(
    session: &'a ChatSession,
    mut messages: Vec<Message>,
    tools: Vec<Value>,
    model: &'a str,
    execute_tools: bool,
    context: Value,
    temperature: Option<f32>,
    parallel_tool_calls: Option<bool>,
    mut tool_calls_made: Vec<ToolCallRequest>,
    iteration: usize,
) -> BoxFuture<'a, Result<ChatResponse, ChatError>> {
    Box::pin(async move {
        if let Some(max) = session.max_iterations {
            if iteration >= max {
                return Err(ChatError::new(ChatErrorKind::MaxIterationsExceeded(max)));
            }
        }

        let body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.clone(),
            tools: if tools.is_empty() { None } else { Some(tools.clone()) },
            temperature,
            parallel_tool_calls,
        };

        let response = session
            .http
            .chat_completion(&body)
            .await
            .map_err(ChatError::from_http)?;

        let assistant = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| ChatError::new(ChatErrorKind::EmptyResponse))?;

        if !assistant.has_tool_calls() {
            session
                .hooks
                .on_assistant_message(&assistant, context)
                .await
                .map_err(|e| ChatError::new(ChatErrorKind::HookFailed(e)))?;
            return Ok(ChatResponse {
                message: assistant,
                tool_calls_made,
                stopped_by_hook: false,
            });
        }

        if !execute_tools {
            return Ok(ChatResponse {
                message: assistant,
                tool_calls_made,
                stopped_by_hook: false,
            });
        }

        let after_assistant = session
            .hooks
            .on_assistant_message(&assistant, context)
            .await
            .map_err(|e| ChatError::new(ChatErrorKind::HookFailed(e)))?;

        if after_assistant.is_stop() {
            // Stop before any tool call in the batch has run: abandon all of
            // them, not just the remainder.
            return Ok(ChatResponse {
                message: assistant,
                tool_calls_made,
                stopped_by_hook: true,
            });
        }
        let mut context = after_assistant.context().clone();

        let known_tools = known_tool_names(&tools);
        let mut tool_messages = Vec::new();
        let mut stopped = false;

        for call in assistant.tool_calls.iter() {
            tool_calls_made.push(call.clone());

            let raw_result = match parse_tool_arguments(&call.function.arguments) {
                Err(_) => json!({"error": "invalid_arguments"}),
                Ok(args) => dispatch(session, &call.function.name, args, &known_tools).await,
            };

            let tool_message = format_tool_result(call.id.clone(), &raw_result);

            let outcome = session
                .hooks
                .on_tool_result(&call.id, &call.function.name, &raw_result, context)
                .await
                .map_err(|e| ChatError::new(ChatErrorKind::HookFailed(e)))?;
            context = outcome.context().clone();
            tool_messages.push(tool_message);

            if outcome.is_stop() {
                stopped = true;
                break;
            }
        }

        messages.push(assistant.clone());
        messages.extend(tool_messages);

        if stopped {
            return Ok(ChatResponse {
                message: assistant,
                tool_calls_made,
                stopped_by_hook: true,
            });
        }

        run_turn(
            session,
            messages,
            tools,
            model,
            execute_tools,
            context,
            temperature,
            parallel_tool_calls,
            tool_calls_made,
            iteration + 1,
        )
        .await
    })
}

/// Resolve one tool call to its result: classify `name` as custom or
/// MCP-routed against the tool list offered this turn before dispatching,
/// and synthesize a literal "not available" result for anything else.
/// Never returns `Err`: failures become an `{"error": ...}` payload so the
/// model sees them as a normal tool result next turn.
async fn dispatch(
    session: &ChatSession,
    name: &str,
    arguments: Value,
    known_tools: &HashSet<String>,
) -> Value {
    if let Some(tool) = session.find_custom_tool(name) {
        return match tool.execute(arguments).await {
            Ok(value) => value,
            Err(message) => json!({"error": message}),
        };
    }

    if !known_tools.contains(name) {
        return json!({"error": format!("Tool not available: {name}")});
    }

    match session.sessions.call_tool(name, arguments).await {
        Ok(value) => value,
        Err(e) => json!({"error": e.to_string()}),
    }
}
