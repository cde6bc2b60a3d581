//! Convenience re-exports for common use.

pub use crate::agent::{AgentAdapter, AgentOptions, InteractiveAgent, PermissionMode};
pub use crate::client::{AgentClient, ClientConnector, SubprocessConnector};
pub use crate::config::AgentConfig;
pub use crate::error::{Result, SkiffError};
pub use crate::tools::{AgentTool, Tool, ToolArguments, ToolOutput, ToolParameters};
pub use crate::types::{
    AssistantMessage, ContentBlock, Message, ResultMessage, ToolResultMessage,
};
