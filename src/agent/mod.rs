//! Agent runtime: options, the SDK adapter, and the interactive loop.

pub mod adapter;
pub mod interactive;
pub mod options;

pub use adapter::AgentAdapter;
pub use interactive::InteractiveAgent;
pub use options::{AgentOptions, PermissionMode, ToolServer};
