//! NDJSON frames exchanged with the SDK subprocess.
//!
//! Each line on the child's stdin is one [`ClientFrame`]; each line on its
//! stdout is one [`ServerEvent`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::options::AgentOptions;
use crate::tools::ToolOutput;
use crate::types::{AssistantMessage, ResultMessage, ToolResultMessage};

/// Requests the adapter sends to the SDK process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Session handshake, carrying the serialized options.
    Initialize { options: WireOptions },
    /// One user prompt.
    User { text: String },
    /// Reply to a `tool_call` event.
    ToolOutput {
        call_id: String,
        output: ToolOutput,
        is_error: bool,
    },
    /// Graceful teardown.
    Shutdown,
}

/// Envelope for one outbound line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientFrame {
    pub session_id: Uuid,
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub request: ClientRequest,
}

/// Events the SDK process sends back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Handshake acknowledgement; must be the first event.
    Ready,
    Assistant(AssistantMessage),
    ToolResult(ToolResultMessage),
    Result(ResultMessage),
    /// The SDK asks the adapter to run a registered tool, addressed by its
    /// qualified invocation identifier.
    ToolCall {
        call_id: String,
        tool: String,
        input: serde_json::Value,
    },
    Error {
        message: String,
    },
}

/// Serialized form of [`AgentOptions`] for the handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub allowed_tools: Vec<String>,
    #[serde(default)]
    pub tool_servers: Vec<WireToolServer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<u32>,
    pub cwd: std::path::PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub permission_mode: crate::agent::options::PermissionMode,
}

/// One tool server in the handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireToolServer {
    pub key: String,
    pub name: String,
    pub version: String,
    pub tools: Vec<WireToolDef>,
}

/// One tool declaration in the handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireToolDef {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl From<&AgentOptions> for WireOptions {
    fn from(options: &AgentOptions) -> Self {
        let mut tool_servers: Vec<WireToolServer> = options
            .tool_servers
            .iter()
            .map(|(key, server)| WireToolServer {
                key: key.clone(),
                name: server.name.clone(),
                version: server.version.clone(),
                tools: server
                    .tools
                    .iter()
                    .map(|tool| WireToolDef {
                        name: tool.name().to_string(),
                        description: tool.description().to_string(),
                        parameters: tool.parameters().schema.clone(),
                    })
                    .collect(),
            })
            .collect();
        tool_servers.sort_by(|a, b| a.key.cmp(&b.key));

        Self {
            system_prompt: options.system_prompt.clone(),
            allowed_tools: options.allowed_tools.clone(),
            tool_servers,
            max_turns: options.max_turns,
            cwd: options.cwd.clone(),
            model: options.model.clone(),
            permission_mode: options.permission_mode,
        }
    }
}
