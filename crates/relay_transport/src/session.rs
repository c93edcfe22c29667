use ractor::ActorRef;
use relay_core::McpToolSchema;
use serde_json::Value;

use crate::error::{TransportError, TransportErrorKind, TransportResult};
use crate::http_session::{self, HttpMsg, HttpSessionConfig};
use crate::stdio::{self, StdioMsg, StdioSessionConfig};

/// A live MCP session, whichever transport backs it.
pub enum SessionTransport {
    Stdio(ActorRef<StdioMsg>),
    Http(ActorRef<HttpMsg>),
}

impl SessionTransport {
    pub async fn connect_stdio(config: StdioSessionConfig) -> TransportResult<Self> {
        Ok(Self::Stdio(stdio::connect(config).await?))
    }

    pub async fn connect_http(config: HttpSessionConfig) -> TransportResult<Self> {
        Ok(Self::Http(http_session::connect(config).await?))
    }

    pub async fn list_tools(&self) -> TransportResult<Vec<McpToolSchema>> {
        match self {
            Self::Stdio(actor) => resolve(actor.call(StdioMsg::ListTools, None).await),
            Self::Http(actor) => resolve(actor.call(HttpMsg::ListTools, None).await),
        }
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> TransportResult<Value> {
        let name = name.to_string();
        match self {
            Self::Stdio(actor) => resolve(
                actor
                    .call(
                        move |reply| StdioMsg::CallTool {
                            name,
                            arguments,
                            reply,
                        },
                        None,
                    )
                    .await,
            ),
            Self::Http(actor) => resolve(
                actor
                    .call(
                        move |reply| HttpMsg::CallTool {
                            name,
                            arguments,
                            reply,
                        },
                        None,
                    )
                    .await,
            ),
        }
    }

    pub fn stop(&self) {
        match self {
            Self::Stdio(actor) => actor.stop(None),
            Self::Http(actor) => actor.stop(None),
        }
    }
}

/// Flatten a ractor call outcome into the transport's own error type: a
/// dropped reply or a closed mailbox both mean the session actor died, which
/// callers already know how to recover from as a crashed server.
fn resolve<T, M>(
    result: Result<ractor::rpc::CallResult<TransportResult<T>>, ractor::MessagingErr<M>>,
) -> TransportResult<T> {
    match result {
        Ok(ractor::rpc::CallResult::Success(inner)) => inner,
        Ok(ractor::rpc::CallResult::Timeout) => Err(TransportError::new(
            TransportErrorKind::OperationTimeout(std::time::Duration::default()),
        )),
        Ok(ractor::rpc::CallResult::SenderError) => Err(TransportError::new(
            TransportErrorKind::ServerCrashed("session actor dropped the reply".to_string()),
        )),
        Err(e) => Err(TransportError::new(TransportErrorKind::ServerCrashed(
            e.to_string(),
        ))),
    }
}
