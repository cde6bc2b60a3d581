//! Message types yielded by an agent session.

pub mod message;

pub use message::{AssistantMessage, ContentBlock, Message, ResultMessage, ToolResultMessage};
