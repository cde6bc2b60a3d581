//! Per-connection options passed to the SDK client.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tools::Tool;

/// Server key the adapter registers custom tools under.
pub const TOOL_SERVER_KEY: &str = "agent_tools";

/// Fallback tool-server name when the agent config carries none.
pub const DEFAULT_SERVER_NAME: &str = "agent-tools";

/// Fallback tool-server version when the agent config carries none.
pub const DEFAULT_SERVER_VERSION: &str = "1.0.0";

/// Fully-qualified invocation identifier for a tool.
///
/// The SDK routes tool calls back to handlers by this exact name, so the
/// convention is load-bearing: `mcp__<server_key>__<tool>`.
pub fn qualified_tool_name(server_key: &str, tool: &str) -> String {
    format!("mcp__{server_key}__{tool}")
}

/// Permission mode the SDK enforces for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    #[default]
    Default,
    AcceptEdits,
    Plan,
    BypassPermissions,
}

/// A named group of tools exposed to the SDK as one logical tool server.
#[derive(Clone)]
pub struct ToolServer {
    pub name: String,
    pub version: String,
    pub tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolServer")
            .field("name", &self.name)
            .field("version", &self.version)
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Configuration value object for one connection attempt.
///
/// Built fresh by [`AgentAdapter::build_options`](crate::agent::AgentAdapter::build_options)
/// on every call; immutable once built.
#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    pub system_prompt: Option<String>,
    pub allowed_tools: Vec<String>,
    pub tool_servers: HashMap<String, ToolServer>,
    pub max_turns: Option<u32>,
    pub cwd: PathBuf,
    pub model: Option<String>,
    pub permission_mode: PermissionMode,
}
