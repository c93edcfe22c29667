use std::time::Duration;

use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use relay_core::McpToolSchema;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{TransportError, TransportErrorKind};
use crate::protocol;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const LIST_TOOLS_TIMEOUT: Duration = Duration::from_secs(30);
const CALL_TOOL_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct HttpSessionConfig {
    pub url: String,
    pub auth_token: String,
    pub execution_id: Option<String>,
}

pub enum HttpMsg {
    ListTools(RpcReplyPort<Result<Vec<McpToolSchema>, TransportError>>),
    CallTool {
        name: String,
        arguments: Value,
        reply: RpcReplyPort<Result<Value, TransportError>>,
    },
}

pub struct HttpState {
    http: reqwest::Client,
    config: HttpSessionConfig,
    session_id: String,
}

pub struct HttpSessionActor;

#[async_trait]
impl Actor for HttpSessionActor {
    type Msg = HttpMsg;
    type State = HttpState;
    type Arguments = HttpSessionConfig;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        config: HttpSessionConfig,
    ) -> Result<Self::State, ActorProcessingErr> {
        let http = reqwest::Client::builder()
            .timeout(CONNECT_TIMEOUT)
            .build()?;

        let request_id = protocol::fresh_request_id();
        let body = protocol::initialize_request(&request_id, "2025-03-26");
        let response = post(&http, &config, &body, None).await?;

        let session_id = response
            .headers()
            .get("mcp-session-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ActorProcessingErr::from(TransportError::new(TransportErrorKind::ConnectFailed(
                    "No session ID received from server".to_string(),
                )))
            })?;
        parse_body(response).await?;

        post(
            &http,
            &config,
            &protocol::initialized_notification(),
            Some(&session_id),
        )
        .await?;

        Ok(HttpState {
            http,
            config,
            session_id,
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            HttpMsg::ListTools(reply) => {
                let result = list_tools(state).await;
                let _ = reply.send(result);
            }
            HttpMsg::CallTool {
                name,
                arguments,
                reply,
            } => {
                let result = call_tool(state, &name, &arguments).await;
                let _ = reply.send(result);
            }
        }
        Ok(())
    }
}

async fn list_tools(state: &mut HttpState) -> Result<Vec<McpToolSchema>, TransportError> {
    let request_id = protocol::fresh_request_id();
    let body = protocol::list_tools_request(&request_id);
    let response = timed_post(state, &body, LIST_TOOLS_TIMEOUT).await?;
    let parsed = parse_mcp_response(response).await?;
    let tools = parsed
        .get("result")
        .and_then(|r| r.get("tools"))
        .cloned()
        .unwrap_or(Value::Array(Vec::new()));
    serde_json::from_value(tools)
        .map_err(|e| TransportError::new(TransportErrorKind::Protocol(e.to_string())))
}

async fn call_tool(
    state: &mut HttpState,
    name: &str,
    arguments: &Value,
) -> Result<Value, TransportError> {
    let request_id = protocol::fresh_request_id();
    let body = protocol::call_tool_request(&request_id, name, arguments);
    let response = timed_post(state, &body, CALL_TOOL_TIMEOUT).await?;
    let parsed = parse_mcp_response(response).await?;
    let result = parsed
        .get("result")
        .cloned()
        .unwrap_or(Value::Object(Default::default()));
    protocol::tool_call_outcome(&result)
        .map_err(|message| TransportError::new(TransportErrorKind::ToolError(message)))
}

async fn timed_post(
    state: &HttpState,
    body: &Value,
    timeout: Duration,
) -> Result<reqwest::Response, TransportError> {
    match tokio::time::timeout(
        timeout,
        post(&state.http, &state.config, body, Some(&state.session_id)),
    )
    .await
    {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(TransportError::new(TransportErrorKind::OperationTimeout(
            timeout,
        ))),
    }
}

async fn post(
    http: &reqwest::Client,
    config: &HttpSessionConfig,
    body: &Value,
    session_id: Option<&str>,
) -> Result<reqwest::Response, TransportError> {
    let mut builder = http
        .post(&config.url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json, text/event-stream")
        .header("Authorization", format!("Bearer {}", config.auth_token))
        .json(body);
    if let Some(session_id) = session_id {
        builder = builder.header("Mcp-Session-Id", session_id);
    }
    if let Some(execution_id) = &config.execution_id {
        builder = builder.header("Execution-Id", execution_id);
    }
    builder
        .send()
        .await
        .map_err(|e| TransportError::new(TransportErrorKind::ConnectFailed(e.to_string())))
}

/// Parse an MCP response, handling session expiry and SSE framing; used for
/// `tools/list`/`tools/call` requests made after the session is established.
async fn parse_mcp_response(response: reqwest::Response) -> Result<Value, TransportError> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(TransportError::new(TransportErrorKind::SessionExpired));
    }
    parse_body(response).await
}

/// Parse a response body that accompanies a 200/202, handling SSE framing.
async fn parse_body(response: reqwest::Response) -> Result<Value, TransportError> {
    let status = response.status();
    if status == StatusCode::ACCEPTED {
        return Ok(Value::Null);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::new(TransportErrorKind::Protocol(format!(
            "status {status}: {body}"
        ))));
    }

    let text = response
        .text()
        .await
        .map_err(|e| TransportError::new(TransportErrorKind::Protocol(e.to_string())))?;

    if text.starts_with("event: ") {
        let Some(data_line) = text.lines().find(|line| line.starts_with("data: ")) else {
            return Ok(Value::Object(Default::default()));
        };
        let payload = data_line.trim_start_matches("data: ");
        return Ok(serde_json::from_str(payload).unwrap_or(Value::Object(Default::default())));
    }

    serde_json::from_str(&text)
        .map_err(|e| TransportError::new(TransportErrorKind::Protocol(e.to_string())))
}

/// Spawn an HTTP session actor and complete its MCP handshake.
pub async fn connect(config: HttpSessionConfig) -> Result<ActorRef<HttpMsg>, TransportError> {
    let (actor_ref, _handle) = Actor::spawn(None, HttpSessionActor, config)
        .await
        .map_err(|e| TransportError::new(TransportErrorKind::ConnectFailed(e.to_string())))?;
    Ok(actor_ref)
}
