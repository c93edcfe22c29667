use std::time::Duration;

use ractor::{Actor, ActorRef};
use relay_core::{ExternalToolSchema, McpToolSchema};
use serde_json::Value;

use crate::config::ServerConfig;
use crate::error::{SessionError, SessionErrorKind};
use crate::manager::{ManagerMsg, SessionManagerActor, SessionSummary, DEFAULT_HEALTH_INTERVAL};

/// A handle to the session manager actor; this is the type the chat loop
/// and its callers actually hold.
#[derive(Clone)]
pub struct SessionManagerHandle {
    actor: ActorRef<ManagerMsg>,
}

impl SessionManagerHandle {
    pub async fn start() -> Result<Self, SessionError> {
        Self::start_with_interval(DEFAULT_HEALTH_INTERVAL).await
    }

    pub async fn start_with_interval(health_interval: Duration) -> Result<Self, SessionError> {
        let (actor, _handle) = Actor::spawn(None, SessionManagerActor, health_interval)
            .await
            .map_err(|e| {
                SessionError::new(SessionErrorKind::UnknownSession(format!(
                    "failed to start session manager: {e}"
                )))
            })?;
        Ok(Self { actor })
    }

    pub async fn add_server(&self, config: ServerConfig) -> Result<String, SessionError> {
        self.call(|reply| ManagerMsg::AddServer { config, reply })
            .await?
    }

    pub async fn remove_server(&self, id: impl Into<String>) -> Result<(), SessionError> {
        let id = id.into();
        self.call(|reply| ManagerMsg::RemoveServer { id, reply })
            .await
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, SessionError> {
        self.call(ManagerMsg::ListSessions).await
    }

    pub async fn get_all_tools(&self) -> Result<Vec<ExternalToolSchema>, SessionError> {
        self.call(ManagerMsg::GetAllTools).await
    }

    pub async fn list_raw_tools(&self) -> Result<Vec<McpToolSchema>, SessionError> {
        self.call(ManagerMsg::ListRawTools).await
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, SessionError> {
        let name = name.to_string();
        self.call(|reply| ManagerMsg::CallTool {
            name,
            arguments,
            reply,
        })
        .await?
    }

    async fn call<T>(
        &self,
        builder: impl FnOnce(ractor::RpcReplyPort<T>) -> ManagerMsg,
    ) -> Result<T, SessionError> {
        match self.actor.call(builder, None).await {
            Ok(ractor::rpc::CallResult::Success(value)) => Ok(value),
            Ok(ractor::rpc::CallResult::Timeout) => {
                Err(SessionError::new(SessionErrorKind::OperationTimeout))
            }
            Ok(ractor::rpc::CallResult::SenderError) | Err(_) => Err(SessionError::new(
                SessionErrorKind::UnknownSession("session manager actor is gone".to_string()),
            )),
        }
    }
}
