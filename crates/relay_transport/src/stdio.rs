use std::time::Duration;

use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use relay_core::McpToolSchema;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout};

use crate::error::{TransportError, TransportErrorKind};
use crate::protocol;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const LIST_TOOLS_TIMEOUT: Duration = Duration::from_secs(30);
const CALL_TOOL_TIMEOUT: Duration = Duration::from_secs(300);

/// Spawn arguments for a stdio MCP session: a command plus its args and env.
#[derive(Debug, Clone)]
pub struct StdioSessionConfig {
    pub command: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

pub enum StdioMsg {
    ListTools(RpcReplyPort<Result<Vec<McpToolSchema>, TransportError>>),
    CallTool {
        name: String,
        arguments: Value,
        reply: RpcReplyPort<Result<Value, TransportError>>,
    },
}

pub struct StdioState {
    #[allow(dead_code)] // keeps the child alive; dropped on actor stop
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    session_id: String,
}

impl StdioState {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

pub struct StdioSessionActor;

#[async_trait]
impl Actor for StdioSessionActor {
    type Msg = StdioMsg;
    type State = StdioState;
    type Arguments = StdioSessionConfig;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        config: StdioSessionConfig,
    ) -> Result<Self::State, ActorProcessingErr> {
        let mut child = tokio::process::Command::new(&config.command)
            .args(&config.args)
            .envs(config.env.iter().cloned())
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take().expect("stdin was piped");
        let stdout = child.stdout.take().expect("stdout was piped");
        let stderr = child.stderr.take().expect("stderr was piped");

        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::debug!(target: "relay_transport::stdio", "{line}");
            }
        });

        let mut stdin = BufWriter::new(stdin);
        let mut stdout = BufReader::new(stdout);

        let request_id = protocol::fresh_request_id();
        let request = protocol::initialize_request(&request_id, "2024-11-05");
        write_line(&mut stdin, &request)
            .await
            .map_err(|e| connect_failed(e.to_string()))?;
        read_frame(&mut stdout, CONNECT_TIMEOUT)
            .await
            .map_err(|e| connect_failed(e.to_string()))?;

        write_line(&mut stdin, &protocol::initialized_notification())
            .await
            .map_err(|e| connect_failed(e.to_string()))?;
        tokio::time::sleep(Duration::from_millis(100)).await;

        Ok(StdioState {
            child,
            stdin,
            stdout,
            session_id: protocol::fresh_request_id(),
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            StdioMsg::ListTools(reply) => {
                let result = list_tools(state).await;
                let _ = reply.send(result);
            }
            StdioMsg::CallTool {
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

async fn list_tools(state: &mut StdioState) -> Result<Vec<McpToolSchema>, TransportError> {
    let request_id = protocol::fresh_request_id();
    let request = protocol::list_tools_request(&request_id);
    write_line(&mut state.stdin, &request)
        .await
        .map_err(|e| TransportError::new(TransportErrorKind::ServerCrashed(e.to_string())))?;
    let response = read_frame(&mut state.stdout, LIST_TOOLS_TIMEOUT).await?;
    let tools = response
        .get("result")
        .and_then(|r| r.get("tools"))
        .cloned()
        .unwrap_or(Value::Array(Vec::new()));
    serde_json::from_value(tools)
        .map_err(|e| TransportError::new(TransportErrorKind::Protocol(e.to_string())))
}

async fn call_tool(
    state: &mut StdioState,
    name: &str,
    arguments: &Value,
) -> Result<Value, TransportError> {
    let request_id = protocol::fresh_request_id();
    let request = protocol::call_tool_request(&request_id, name, arguments);
    write_line(&mut state.stdin, &request)
        .await
        .map_err(|e| TransportError::new(TransportErrorKind::ServerCrashed(e.to_string())))?;
    let response = read_frame_with_timeout(&mut state.stdout, CALL_TOOL_TIMEOUT).await?;
    let result = response
        .get("result")
        .cloned()
        .unwrap_or(Value::Object(Default::default()));
    protocol::tool_call_outcome(&result)
        .map_err(|message| TransportError::new(TransportErrorKind::ToolError(message)))
}

async fn write_line(stdin: &mut BufWriter<ChildStdin>, value: &Value) -> std::io::Result<()> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    stdin.write_all(&line).await?;
    stdin.flush().await
}

/// Read lines until a JSON object frame is found, discarding server log
/// output (any line not starting with `{`). Errors with `ServerCrashed` on
/// a connect-time fault so callers treat it uniformly with in-call faults.
async fn read_frame(
    stdout: &mut BufReader<ChildStdout>,
    timeout: Duration,
) -> Result<Value, TransportError> {
    match tokio::time::timeout(timeout, read_frame_inner(stdout)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TransportError::new(TransportErrorKind::ServerCrashed(e))),
        Err(_) => Err(TransportError::new(TransportErrorKind::ConnectFailed(
            "timed out waiting for response".to_string(),
        ))),
    }
}

/// Same framing as [`read_frame`] but a timeout surfaces as
/// [`TransportErrorKind::OperationTimeout`] rather than a connect failure,
/// matching the distinct recovery policy for in-flight tool calls.
async fn read_frame_with_timeout(
    stdout: &mut BufReader<ChildStdout>,
    timeout: Duration,
) -> Result<Value, TransportError> {
    match tokio::time::timeout(timeout, read_frame_inner(stdout)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TransportError::new(TransportErrorKind::ServerCrashed(e))),
        Err(_) => Err(TransportError::new(TransportErrorKind::OperationTimeout(
            timeout,
        ))),
    }
}

async fn read_frame_inner(stdout: &mut BufReader<ChildStdout>) -> Result<Value, String> {
    loop {
        let mut line = String::new();
        let bytes_read = stdout
            .read_line(&mut line)
            .await
            .map_err(|e| e.to_string())?;
        if bytes_read == 0 {
            return Err("child process closed stdout".to_string());
        }
        let trimmed = line.trim();
        if !trimmed.starts_with('{') {
            continue; // server log line, not a protocol frame
        }
        return serde_json::from_str(trimmed).map_err(|e| e.to_string());
    }
}

fn connect_failed(message: String) -> ActorProcessingErr {
    TransportError::new(TransportErrorKind::ConnectFailed(message)).into()
}

/// Spawn a stdio session actor and complete its MCP handshake.
pub async fn connect(
    config: StdioSessionConfig,
) -> Result<ActorRef<StdioMsg>, TransportError> {
    let (actor_ref, _handle) = Actor::spawn(None, StdioSessionActor, config)
        .await
        .map_err(|e| TransportError::new(TransportErrorKind::ConnectFailed(e.to_string())))?;
    Ok(actor_ref)
}
