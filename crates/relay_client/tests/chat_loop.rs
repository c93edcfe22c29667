use std::sync::Mutex;

use async_trait::async_trait;
use futures::FutureExt;
use relay_client::{ChatRequest, ChatSession, CustomTool, HookOutcome, Hooks, chat};
use relay_core::{Message, Role};
use relay_http::{ChatCompletionChoice, ChatCompletionRequest, ChatCompletionResponse, CompletionBackend, HttpClientError};
use relay_session::SessionManagerHandle;
use serde_json::{Value, json};

/// A completion backend that returns a fixed sequence of responses, one per
/// call, so a test can script an entire multi-turn conversation.
struct ScriptedBackend {
    responses: Mutex<std::collections::VecDeque<Message>>,
}

impl ScriptedBackend {
    fn new(turns: Vec<Message>) -> Self {
        Self {
            responses: Mutex::new(turns.into()),
        }
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn chat_completion(
        &self,
        _request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, HttpClientError> {
        let message = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("test script ran out of responses");
        Ok(ChatCompletionResponse {
            choices: vec![ChatCompletionChoice { message }],
        })
    }
}

async fn bare_session() -> SessionManagerHandle {
    SessionManagerHandle::start()
        .await
        .expect("session manager starts with no servers configured")
}

fn echo_tool() -> CustomTool {
    let schema: relay_core::ExternalToolSchema = serde_json::from_value(json!({
        "type": "function",
        "function": {
            "name": "echo",
            "description": "echoes its input",
            "parameters": {"type": "object", "properties": {}, "required": []},
        }
    }))
    .unwrap();
    CustomTool::new(schema, |args: Value| {
        async move { Ok(json!({"content": [{"type": "text", "text": format!("{args}")}]})) }
            .boxed()
    })
}

#[tokio::test]
async fn s1_no_tools_passes_through() {
    let backend = ScriptedBackend::new(vec![Message::assistant("Hello!", vec![])]);
    let session = ChatSession::builder()
        .http(std::sync::Arc::new(backend) as std::sync::Arc<dyn CompletionBackend>)
        .sessions(bare_session().await)
        .build();

    let response = chat(
        &session,
        ChatRequest::new("gpt-test", vec![Message::user("Hi")]),
    )
    .await
    .unwrap();

    assert_eq!(response.message.content, "Hello!");
    assert!(response.tool_calls_made.is_empty());
    assert!(!response.stopped_by_hook);
}

#[tokio::test]
async fn s2_one_tool_round_trip() {
    let call = relay_core::ToolCallRequest::new("c1", "echo", r#"{"path":"/a"}"#);
    let backend = ScriptedBackend::new(vec![
        Message::assistant("", vec![call]),
        Message::assistant("Here is the file: contents", vec![]),
    ]);
    let session = ChatSession::builder()
        .http(std::sync::Arc::new(backend) as std::sync::Arc<dyn CompletionBackend>)
        .sessions(bare_session().await)
        .custom_tools(vec![echo_tool()])
        .build();

    let response = chat(
        &session,
        ChatRequest::new("gpt-test", vec![Message::user("read /a")]),
    )
    .await
    .unwrap();

    assert_eq!(response.message.content, "Here is the file: contents");
    assert_eq!(response.tool_calls_made.len(), 1);
    assert_eq!(response.tool_calls_made[0].id, "c1");
}

#[tokio::test]
async fn s5_unwrapped_content_array_is_not_json_encoded() {
    let schema: relay_core::ExternalToolSchema = serde_json::from_value(json!({
        "type": "function",
        "function": {"name": "multiline", "description": "", "parameters": {"type": "object", "properties": {}, "required": []}}
    })).unwrap();
    let tool = CustomTool::new(schema, |_args: Value| {
        async move { Ok(json!([{"type": "text", "text": "L1"}, {"type": "text", "text": "L2"}])) }.boxed()
    });

    let call = relay_core::ToolCallRequest::new("c1", "multiline", "{}");
    let backend = ScriptedBackend::new(vec![
        Message::assistant("", vec![call]),
        Message::assistant("done", vec![]),
    ]);
    let session = ChatSession::builder()
        .http(std::sync::Arc::new(backend) as std::sync::Arc<dyn CompletionBackend>)
        .sessions(bare_session().await)
        .custom_tools(vec![tool])
        .build();

    chat(&session, ChatRequest::new("gpt-test", vec![Message::user("go")]))
        .await
        .unwrap();
    // The assertion that matters is indirect: if format_tool_result had
    // JSON-encoded the array, ScriptedBackend's second canned response would
    // still have been returned (it doesn't inspect the transcript), so this
    // test only proves the loop doesn't panic/error on that shape. The
    // content-shape guarantee itself is covered directly in relay_core.
}

struct StoppingHooks;

#[async_trait]
impl Hooks for StoppingHooks {
    async fn on_tool_result(
        &self,
        _tool_call_id: &str,
        _tool_name: &str,
        _result: &Value,
        context: Value,
    ) -> Result<HookOutcome, String> {
        Ok(HookOutcome::Stop(context))
    }
}

#[tokio::test]
async fn s6_hook_stop_halts_remaining_tool_calls() {
    let calls = vec![
        relay_core::ToolCallRequest::new("c1", "echo", "{}"),
        relay_core::ToolCallRequest::new("c2", "echo", "{}"),
        relay_core::ToolCallRequest::new("c3", "echo", "{}"),
    ];
    // Only one scripted response: if the loop incorrectly recursed after the
    // stop, ScriptedBackend would panic on an empty queue.
    let backend = ScriptedBackend::new(vec![Message::assistant("", calls)]);
    let session = ChatSession::builder()
        .http(std::sync::Arc::new(backend) as std::sync::Arc<dyn CompletionBackend>)
        .sessions(bare_session().await)
        .custom_tools(vec![echo_tool()])
        .hooks(std::sync::Arc::new(StoppingHooks))
        .build();

    let response = chat(
        &session,
        ChatRequest::new("gpt-test", vec![Message::user("go")]),
    )
    .await
    .unwrap();

    assert!(response.stopped_by_hook);
    assert_eq!(response.tool_calls_made.len(), 1);
}

#[tokio::test]
async fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), json!("assistant"));
}
