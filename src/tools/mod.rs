//! Tool system: named, schema-typed functions an agent exposes to the SDK.

pub mod arguments;
pub mod output;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use output::{ToolContent, ToolOutput};
pub use tool::{AgentTool, Tool};
pub use types::ToolParameters;
