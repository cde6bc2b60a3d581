//! The SDK client seam.
//!
//! The external agent SDK is consumed through two traits: [`AgentClient`],
//! one connected session, and [`ClientConnector`], the factory that performs
//! the session handshake. Production code uses the subprocess transport;
//! tests substitute scripted implementations.

pub mod subprocess;
pub mod wire;

use async_trait::async_trait;

use crate::agent::options::AgentOptions;
use crate::error::Result;
use crate::types::Message;

/// One connected SDK session.
///
/// The response stream is pull-based: after [`query`](Self::query), call
/// [`next_message`](Self::next_message) until `None` or a final
/// [`Message::Result`]. Single-pass, non-restartable, one in-flight query.
#[async_trait]
pub trait AgentClient: Send {
    /// Send a user prompt for the next turn.
    async fn query(&mut self, prompt: &str) -> Result<()>;

    /// Pull the next message of the current response stream.
    ///
    /// `None` means the stream (or the session) ended.
    async fn next_message(&mut self) -> Option<Result<Message>>;

    /// Tear down the session. Safe to call from any cleanup path.
    async fn disconnect(&mut self) -> Result<()>;
}

/// Opens SDK sessions.
///
/// `open` performs the full handshake; a failure is fatal to the caller, no
/// retry.
#[async_trait]
pub trait ClientConnector: Send + Sync {
    async fn open(&self, options: AgentOptions) -> Result<Box<dyn AgentClient>>;
}

pub use subprocess::{SubprocessClient, SubprocessConnector};
