use std::time::{Duration, Instant};

use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use relay_core::{ExternalToolSchema, McpToolSchema, ToolSchemaConverter, openai::OpenAi};
use relay_transport::{SessionTransport, TransportErrorKind};
use serde_json::Value;

use crate::config::ServerConfig;
use crate::error::{SessionError, SessionErrorKind};

pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Connected,
    Disconnected,
}

/// A point-in-time view of one registered session, for `list_sessions`.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: String,
    pub status: SessionStatus,
    pub tool_count: usize,
    pub last_health_check: Instant,
}

struct SessionRecord {
    id: String,
    config: ServerConfig,
    transport: Option<SessionTransport>,
    status: SessionStatus,
    tools: Vec<McpToolSchema>,
    last_health_check: Instant,
}

pub enum ManagerMsg {
    AddServer {
        config: ServerConfig,
        reply: RpcReplyPort<Result<String, SessionError>>,
    },
    RemoveServer {
        id: String,
        reply: RpcReplyPort<()>,
    },
    ListSessions(RpcReplyPort<Vec<SessionSummary>>),
    GetAllTools(RpcReplyPort<Vec<ExternalToolSchema>>),
    ListRawTools(RpcReplyPort<Vec<McpToolSchema>>),
    CallTool {
        name: String,
        arguments: Value,
        reply: RpcReplyPort<Result<Value, SessionError>>,
    },
    HealthCheck,
}

pub struct SessionManagerActor;

pub struct SessionManagerState {
    sessions: Vec<SessionRecord>,
    health_interval: Duration,
}

#[async_trait]
impl Actor for SessionManagerActor {
    type Msg = ManagerMsg;
    type State = SessionManagerState;
    type Arguments = Duration;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        health_interval: Duration,
    ) -> Result<Self::State, ActorProcessingErr> {
        myself.send_interval(health_interval, || ManagerMsg::HealthCheck);
        Ok(SessionManagerState {
            sessions: Vec::new(),
            health_interval,
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            ManagerMsg::AddServer { config, reply } => {
                let result = add_server(state, config).await;
                let _ = reply.send(result);
            }
            ManagerMsg::RemoveServer { id, reply } => {
                if let Some(pos) = state.sessions.iter().position(|s| s.id == id) {
                    let record = state.sessions.remove(pos);
                    if let Some(transport) = record.transport {
                        transport.stop();
                    }
                }
                let _ = reply.send(());
            }
            ManagerMsg::ListSessions(reply) => {
                let summaries = state
                    .sessions
                    .iter()
                    .map(|s| SessionSummary {
                        id: s.id.clone(),
                        status: s.status,
                        tool_count: s.tools.len(),
                        last_health_check: s.last_health_check,
                    })
                    .collect();
                let _ = reply.send(summaries);
            }
            ManagerMsg::GetAllTools(reply) => {
                let tools = state
                    .sessions
                    .iter()
                    .filter(|s| s.status == SessionStatus::Connected)
                    .flat_map(|s| s.tools.iter())
                    .map(OpenAi::convert)
                    .collect();
                let _ = reply.send(tools);
            }
            ManagerMsg::ListRawTools(reply) => {
                let tools = state
                    .sessions
                    .iter()
                    .filter(|s| s.status == SessionStatus::Connected)
                    .flat_map(|s| s.tools.iter().cloned())
                    .collect();
                let _ = reply.send(tools);
            }
            ManagerMsg::CallTool {
                name,
                arguments,
                reply,
            } => {
                let result = call_tool(state, &name, arguments).await;
                let _ = reply.send(result);
            }
            ManagerMsg::HealthCheck => {
                health_check(state).await;
            }
        }
        Ok(())
    }
}

async fn add_server(
    state: &mut SessionManagerState,
    config: ServerConfig,
) -> Result<String, SessionError> {
    let id = config.derive_id();
    let transport = connect(&config).await.map_err(|e| {
        SessionError::new(SessionErrorKind::UnknownSession(format!(
            "failed to connect: {e}"
        )))
    })?;

    let tools = filter_valid_tools(transport.list_tools().await.unwrap_or_default());
    if let Some(existing) = state.sessions.iter_mut().find(|s| s.id == id) {
        if let Some(old) = existing.transport.take() {
            old.stop();
        }
        existing.transport = Some(transport);
        existing.tools = tools;
        existing.status = SessionStatus::Connected;
        existing.last_health_check = Instant::now();
    } else {
        state.sessions.push(SessionRecord {
            id: id.clone(),
            config,
            transport: Some(transport),
            status: SessionStatus::Connected,
            tools,
            last_health_check: Instant::now(),
        });
    }
    Ok(id)
}

/// Drop tools whose schema a server advertised but can't actually be
/// converted or invoked against, rather than letting a malformed one reach
/// the model as an offered tool.
fn filter_valid_tools(tools: Vec<McpToolSchema>) -> Vec<McpToolSchema> {
    tools
        .into_iter()
        .filter(|t| match t.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(tool = %t.name, error = %e, "dropping tool with malformed schema");
                false
            }
        })
        .collect()
}

async fn connect(config: &ServerConfig) -> relay_transport::TransportResult<SessionTransport> {
    if let Some(stdio) = config.to_stdio() {
        return SessionTransport::connect_stdio(stdio).await;
    }
    if let Some(http) = config.to_http() {
        return SessionTransport::connect_http(http).await;
    }
    unreachable!("ServerConfig is always Stdio or Http")
}

async fn call_tool(
    state: &mut SessionManagerState,
    name: &str,
    arguments: Value,
) -> Result<Value, SessionError> {
    let candidate_positions: Vec<usize> = state
        .sessions
        .iter()
        .enumerate()
        .filter(|(_, s)| s.status == SessionStatus::Connected && s.tools.iter().any(|t| t.name == name))
        .map(|(i, _)| i)
        .collect();

    if candidate_positions.is_empty() {
        return Err(SessionError::new(SessionErrorKind::ToolNotFound(
            name.to_string(),
        )));
    }

    for pos in candidate_positions {
        let Some(transport) = state.sessions[pos].transport.as_ref() else {
            continue;
        };
        match transport.call_tool(name, arguments.clone()).await {
            Ok(value) => return Ok(value),
            Err(err) => match err.kind() {
                TransportErrorKind::ServerCrashed(_) => {
                    state.sessions[pos].status = SessionStatus::Disconnected;
                    if let Some(old) = state.sessions[pos].transport.take() {
                        old.stop();
                    }
                    let config = state.sessions[pos].config.clone();
                    if let Ok(fresh) = connect(&config).await {
                        state.sessions[pos].transport = Some(fresh);
                        state.sessions[pos].status = SessionStatus::Connected;
                        if let Some(transport) = state.sessions[pos].transport.as_ref() {
                            if let Ok(value) = transport.call_tool(name, arguments.clone()).await {
                                return Ok(value);
                            }
                        }
                    }
                    continue;
                }
                TransportErrorKind::OperationTimeout(_) => {
                    return Err(SessionError::new(SessionErrorKind::OperationTimeout));
                }
                TransportErrorKind::SessionExpired => {
                    let message = err.to_string();
                    state.sessions[pos].status = SessionStatus::Disconnected;
                    return Err(SessionError::new(SessionErrorKind::SessionExpired(message)));
                }
                TransportErrorKind::ToolError(_)
                | TransportErrorKind::Protocol(_)
                | TransportErrorKind::ConnectFailed(_) => {
                    return Err(SessionError::new(SessionErrorKind::Other(err.to_string())));
                }
            },
        }
    }

    Err(SessionError::new(SessionErrorKind::ToolNotFound(
        name.to_string(),
    )))
}

async fn health_check(state: &mut SessionManagerState) {
    for record in state.sessions.iter_mut() {
        match record.status {
            SessionStatus::Connected => {
                if let Some(transport) = record.transport.as_ref() {
                    match transport.list_tools().await {
                        Ok(tools) => {
                            record.tools = filter_valid_tools(tools);
                            record.last_health_check = Instant::now();
                        }
                        Err(e) => {
                            tracing::warn!(session = %record.id, error = %e, "health check failed, marking disconnected");
                            record.status = SessionStatus::Disconnected;
                        }
                    }
                }
            }
            SessionStatus::Disconnected => {
                if let Ok(transport) = connect(&record.config).await {
                    record.tools = filter_valid_tools(transport.list_tools().await.unwrap_or_default());
                    record.transport = Some(transport);
                    record.status = SessionStatus::Connected;
                    record.last_health_check = Instant::now();
                    tracing::info!(session = %record.id, "reconnected");
                }
            }
        }
    }
}

impl SessionManagerState {
    #[cfg(test)]
    pub(crate) fn health_interval(&self) -> Duration {
        self.health_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_interval_reflects_constructor_argument() {
        let state = SessionManagerState {
            sessions: Vec::new(),
            health_interval: Duration::from_secs(42),
        };
        assert_eq!(state.health_interval(), Duration::from_secs(42));
    }
}
