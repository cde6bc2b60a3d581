//! Subprocess transport: the SDK binary driven over piped stdio.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use uuid::Uuid;

use super::wire::{ClientFrame, ClientRequest, ServerEvent, WireOptions};
use super::{AgentClient, ClientConnector};
use crate::agent::options::{qualified_tool_name, AgentOptions};
use crate::config::require_env;
use crate::error::{Result, SkiffError};
use crate::tools::{Tool, ToolArguments, ToolOutput};
use crate::types::Message;

/// Environment variable naming the SDK binary.
pub const SDK_BIN_ENV: &str = "SKIFF_SDK_BIN";

/// How long a graceful shutdown may take before the child is killed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Opens [`SubprocessClient`] sessions against a fixed SDK binary.
#[derive(Debug, Clone)]
pub struct SubprocessConnector {
    program: PathBuf,
}

impl SubprocessConnector {
    /// Use an explicit SDK binary path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve the SDK binary from `SKIFF_SDK_BIN` (required).
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(require_env(SDK_BIN_ENV)?))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl ClientConnector for SubprocessConnector {
    async fn open(&self, options: AgentOptions) -> Result<Box<dyn AgentClient>> {
        let client = SubprocessClient::spawn(&self.program, options).await?;
        Ok(Box::new(client))
    }
}

/// One live SDK session over a child process speaking NDJSON.
pub struct SubprocessClient {
    session_id: Uuid,
    seq: u64,
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Lines<BufReader<ChildStdout>>,
    // Handlers keyed by qualified invocation identifier.
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl SubprocessClient {
    /// Spawn the SDK binary and perform the session handshake.
    pub async fn spawn(program: &Path, options: AgentOptions) -> Result<Self> {
        let mut command = Command::new(program);
        command
            .arg("--stdio")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if !options.cwd.as_os_str().is_empty() {
            command.current_dir(&options.cwd);
        }

        let mut child = command.spawn().map_err(|e| {
            SkiffError::Connection(format!("failed to spawn {}: {e}", program.display()))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SkiffError::Connection("SDK process stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SkiffError::Connection("SDK process stdout unavailable".into()))?;

        let mut tools = HashMap::new();
        for (key, server) in &options.tool_servers {
            for tool in &server.tools {
                tools.insert(qualified_tool_name(key, tool.name()), tool.clone());
            }
        }

        let wire_options = WireOptions::from(&options);
        let mut client = Self {
            session_id: Uuid::new_v4(),
            seq: 0,
            child,
            stdin: Some(stdin),
            lines: BufReader::new(stdout).lines(),
            tools,
        };

        tracing::debug!(
            session_id = %client.session_id,
            program = %program.display(),
            "starting SDK session handshake"
        );
        client
            .send(ClientRequest::Initialize {
                options: wire_options,
            })
            .await?;

        match client.read_event().await? {
            Some(ServerEvent::Ready) => {
                tracing::info!(session_id = %client.session_id, "SDK session established");
                Ok(client)
            }
            Some(other) => Err(SkiffError::Connection(format!(
                "unexpected handshake reply: {other:?}"
            ))),
            None => Err(SkiffError::Connection(
                "SDK process closed the stream during handshake".into(),
            )),
        }
    }

    async fn send(&mut self, request: ClientRequest) -> Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| SkiffError::InvalidState("session already closed".into()))?;
        self.seq += 1;
        let frame = ClientFrame {
            session_id: self.session_id,
            seq: self.seq,
            timestamp: Utc::now(),
            request,
        };
        let mut line = serde_json::to_string(&frame)?;
        line.push('\n');
        stdin.write_all(line.as_bytes()).await?;
        stdin.flush().await?;
        Ok(())
    }

    async fn read_event(&mut self) -> Result<Option<ServerEvent>> {
        loop {
            match self.lines.next_line().await? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => {
                    return serde_json::from_str(&line)
                        .map(Some)
                        .map_err(|e| SkiffError::Stream(format!("malformed event: {e}")));
                }
            }
        }
    }

    /// Run a registered handler and answer the SDK.
    ///
    /// A failed or unknown handler is reported back with `is_error: true`;
    /// it never tears down the stream.
    async fn handle_tool_call(
        &mut self,
        call_id: String,
        tool: String,
        input: serde_json::Value,
    ) -> Result<()> {
        let handler = self.tools.get(&tool).cloned();
        let (output, is_error) = match handler {
            Some(handler) => match handler.execute(&ToolArguments::new(input)).await {
                Ok(output) => (output, false),
                Err(e) => {
                    tracing::error!(tool = %tool, error = %e, "tool handler failed");
                    (ToolOutput::text(e.to_string()), true)
                }
            },
            None => {
                tracing::error!(tool = %tool, "tool call for unregistered tool");
                (ToolOutput::text(format!("unknown tool: {tool}")), true)
            }
        };
        self.send(ClientRequest::ToolOutput {
            call_id,
            output,
            is_error,
        })
        .await
    }
}

#[async_trait]
impl AgentClient for SubprocessClient {
    async fn query(&mut self, prompt: &str) -> Result<()> {
        self.send(ClientRequest::User {
            text: prompt.to_string(),
        })
        .await
    }

    async fn next_message(&mut self) -> Option<Result<Message>> {
        loop {
            match self.read_event().await {
                Ok(None) => return None,
                Ok(Some(event)) => match event {
                    ServerEvent::Assistant(m) => return Some(Ok(Message::Assistant(m))),
                    ServerEvent::ToolResult(m) => return Some(Ok(Message::ToolResult(m))),
                    ServerEvent::Result(m) => return Some(Ok(Message::Result(m))),
                    ServerEvent::ToolCall {
                        call_id,
                        tool,
                        input,
                    } => {
                        if let Err(e) = self.handle_tool_call(call_id, tool, input).await {
                            return Some(Err(e));
                        }
                    }
                    ServerEvent::Error { message } => {
                        return Some(Err(SkiffError::Stream(message)))
                    }
                    ServerEvent::Ready => {
                        return Some(Err(SkiffError::Stream(
                            "unexpected ready event mid-stream".into(),
                        )))
                    }
                },
                Err(e) => return Some(Err(e)),
            }
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.stdin.is_some() {
            // Best effort; the child may already be gone.
            let _ = self.send(ClientRequest::Shutdown).await;
            self.stdin = None;
        }
        match tokio::time::timeout(SHUTDOWN_GRACE, self.child.wait()).await {
            Ok(status) => {
                let status = status?;
                tracing::debug!(session_id = %self.session_id, %status, "SDK process exited");
            }
            Err(_) => {
                tracing::warn!(session_id = %self.session_id, "SDK process ignored shutdown, killing");
                self.child.start_kill().ok();
                self.child.wait().await?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for SubprocessClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubprocessClient")
            .field("session_id", &self.session_id)
            .field("seq", &self.seq)
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_requires_the_binary_variable() {
        // Not set in the test environment.
        std::env::remove_var(SDK_BIN_ENV);
        let err = SubprocessConnector::from_env().unwrap_err();
        assert!(matches!(err, SkiffError::Configuration(_)));
    }

    #[test]
    fn explicit_program_is_kept() {
        let connector = SubprocessConnector::new("/usr/local/bin/agent-sdk");
        assert_eq!(
            connector.program(),
            Path::new("/usr/local/bin/agent-sdk")
        );
    }

    #[tokio::test]
    async fn spawn_failure_is_a_connection_error() {
        let err = SubprocessClient::spawn(
            Path::new("/nonexistent/sdk-binary"),
            AgentOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SkiffError::Connection(_)));
    }
}
