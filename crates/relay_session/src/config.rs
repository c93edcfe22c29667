use relay_transport::{HttpSessionConfig, StdioSessionConfig};
use serde::{Deserialize, Serialize};

/// The configuration for one MCP server, before it's been connected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerConfig {
    Stdio {
        command: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        env: Vec<(String, String)>,
    },
    Http {
        url: String,
        auth_token: String,
        #[serde(default)]
        execution_id: Option<String>,
    },
}

impl ServerConfig {
    /// Deterministic id for this config; see [`relay_core::derive_server_id`].
    pub fn derive_id(&self) -> String {
        let value = serde_json::to_value(self).expect("ServerConfig always serializes");
        relay_core::derive_server_id(&value)
    }

    pub(crate) fn to_stdio(&self) -> Option<StdioSessionConfig> {
        match self {
            Self::Stdio { command, args, env } => Some(StdioSessionConfig {
                command: command.clone(),
                args: args.clone(),
                env: env.clone(),
            }),
            Self::Http { .. } => None,
        }
    }

    pub(crate) fn to_http(&self) -> Option<HttpSessionConfig> {
        match self {
            Self::Http {
                url,
                auth_token,
                execution_id,
            } => Some(HttpSessionConfig {
                url: url.clone(),
                auth_token: auth_token.clone(),
                execution_id: execution_id.clone(),
            }),
            Self::Stdio { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_stdio_config_produces_same_id() {
        let a = ServerConfig::Stdio {
            command: "npx".to_string(),
            args: vec!["server".to_string()],
            env: vec![("FOO".to_string(), "bar".to_string())],
        };
        let b = a.clone();
        assert_eq!(a.derive_id(), b.derive_id());
    }

    #[test]
    fn stdio_and_http_configs_differ() {
        let stdio = ServerConfig::Stdio {
            command: "npx".to_string(),
            args: vec![],
            env: vec![],
        };
        let http = ServerConfig::Http {
            url: "https://example.com/mcp".to_string(),
            auth_token: "tok".to_string(),
            execution_id: None,
        };
        assert_ne!(stdio.derive_id(), http.derive_id());
    }
}
