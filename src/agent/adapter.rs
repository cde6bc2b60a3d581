//! The agent runtime adapter.
//!
//! [`AgentAdapter`] owns one SDK session and turns a user prompt into a
//! finite stream of [`Message`]s. Construction loads the agent's static
//! configuration; `with_*` builders customize the instance (system prompt,
//! custom tools, client seam).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::{Stream, StreamExt};

use super::options::{
    qualified_tool_name, AgentOptions, ToolServer, DEFAULT_SERVER_NAME, DEFAULT_SERVER_VERSION,
    TOOL_SERVER_KEY,
};
use crate::client::{AgentClient, ClientConnector, SubprocessConnector};
use crate::config::{self, AgentConfig};
use crate::error::{Result, SkiffError};
use crate::tools::Tool;
use crate::types::Message;

/// A configured wrapper around one SDK client session.
///
/// State machine per instance: `Disconnected → Connected → Disconnected`,
/// reusable. At most one in-flight query; the previous response stream must
/// be fully consumed before the next query.
pub struct AgentAdapter {
    config_dir: PathBuf,
    config: AgentConfig,
    system_prompt: Option<String>,
    model: Option<String>,
    tools: Vec<Arc<dyn Tool>>,
    connector: Option<Arc<dyn ClientConnector>>,
    client: Option<Box<dyn AgentClient>>,
    connected: bool,
}

impl AgentAdapter {
    /// Create an adapter for an agent directory.
    ///
    /// Loads `<config_dir>/.env` (if present) and `config.yaml` (missing
    /// file → empty configuration). No other side effects.
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();
        config::load_dotenv(&config_dir);
        let config = AgentConfig::load(&config_dir)?;
        tracing::info!(
            agent = config.name.as_deref().unwrap_or("agent"),
            config_dir = %config_dir.display(),
            "initialized agent adapter"
        );
        Ok(Self {
            config_dir,
            config,
            system_prompt: None,
            model: None,
            tools: Vec::new(),
            connector: None,
            client: None,
            connected: false,
        })
    }

    /// Override the configured system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Override the configured model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Register a custom tool.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Register several custom tools, preserving order.
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Substitute the client seam (defaults to the subprocess connector,
    /// resolved lazily at connect time).
    pub fn with_connector(mut self, connector: Arc<dyn ClientConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Effective system prompt: the override if set, else the configured one.
    pub fn system_prompt(&self) -> Option<String> {
        self.system_prompt
            .clone()
            .or_else(|| self.config.system_prompt.clone())
    }

    /// The registered custom tools, in registration order.
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Compose a fresh [`AgentOptions`] from the current tools and
    /// configuration. No caching across calls.
    ///
    /// With tools present, they are registered under the single logical
    /// server key and each tool's qualified invocation identifier is
    /// appended to the allowed list; without tools, the server map is empty
    /// and the allowed list is exactly the configured one.
    pub fn build_options(&self) -> AgentOptions {
        let mut allowed_tools = self.config.allowed_tools.clone();
        let mut tool_servers = HashMap::new();

        if !self.tools.is_empty() {
            tool_servers.insert(
                TOOL_SERVER_KEY.to_string(),
                ToolServer {
                    name: self
                        .config
                        .name
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
                    version: self
                        .config
                        .version
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SERVER_VERSION.to_string()),
                    tools: self.tools.clone(),
                },
            );
            for tool in &self.tools {
                allowed_tools.push(qualified_tool_name(TOOL_SERVER_KEY, tool.name()));
            }
        }

        AgentOptions {
            system_prompt: self.system_prompt(),
            allowed_tools,
            tool_servers,
            max_turns: self.config.max_turns,
            cwd: self.config_dir.clone(),
            model: self.model.clone().or_else(|| self.config.model.clone()),
            permission_mode: self.config.permission_mode.unwrap_or_default(),
        }
    }

    /// Open the SDK session. Idempotent; a handshake failure propagates
    /// fail-fast, no retry.
    pub async fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Ok(());
        }
        let options = self.build_options();
        let connector = match &self.connector {
            Some(connector) => connector.clone(),
            None => {
                let connector: Arc<dyn ClientConnector> =
                    Arc::new(SubprocessConnector::from_env()?);
                self.connector = Some(connector.clone());
                connector
            }
        };
        self.client = Some(connector.open(options).await?);
        self.connected = true;
        tracing::info!("connected to agent SDK");
        Ok(())
    }

    /// Tear down the SDK session. Idempotent; safe from any cleanup path.
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        if let Some(mut client) = self.client.take() {
            client.disconnect().await?;
        }
        tracing::info!("disconnected from agent SDK");
        Ok(())
    }

    /// Send a prompt and stream the response messages.
    ///
    /// Connects lazily if needed. The returned stream is single-pass and
    /// finite: it ends after the final [`Message::Result`] (or the first
    /// stream error). Consume it fully before the next query.
    pub async fn query(
        &mut self,
        prompt: &str,
    ) -> Result<impl Stream<Item = Result<Message>> + '_> {
        if !self.connected {
            self.connect().await?;
        }
        let preview: String = prompt.chars().take(100).collect();
        tracing::info!(prompt = %preview, "sending query");

        let client = self
            .client
            .as_mut()
            .ok_or_else(|| SkiffError::InvalidState("connected without a live client".into()))?;
        client.query(prompt).await?;

        Ok(async_stream::stream! {
            loop {
                match client.next_message().await {
                    Some(Ok(message)) => {
                        let done = message.is_final();
                        yield Ok(message);
                        if done {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        yield Err(e);
                        break;
                    }
                    None => break,
                }
            }
        })
    }

    /// Drain one query and newline-join the assistant text blocks, in
    /// stream order. Tool invocations and result metadata are discarded.
    pub async fn process_message(&mut self, prompt: &str) -> Result<String> {
        let mut parts: Vec<String> = Vec::new();
        {
            let mut stream = std::pin::pin!(self.query(prompt).await?);
            while let Some(message) = stream.next().await {
                if let Message::Assistant(msg) = message? {
                    parts.extend(msg.text_blocks().map(str::to_string));
                }
            }
        }
        Ok(parts.join("\n"))
    }

    /// Scoped-acquisition bracket: connect, run the body, then disconnect
    /// exactly once whether the body returned or failed.
    pub async fn scoped<T, F>(&mut self, body: F) -> Result<T>
    where
        F: for<'a> FnOnce(&'a mut AgentAdapter) -> BoxFuture<'a, Result<T>>,
    {
        self.connect().await?;
        let result = body(self).await;
        let cleanup = self.disconnect().await;
        match result {
            Ok(value) => cleanup.map(|_| value),
            Err(e) => {
                // The body's error is the interesting one.
                let _ = cleanup;
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for AgentAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentAdapter")
            .field("config_dir", &self.config_dir)
            .field("config", &self.config)
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field("connected", &self.connected)
            .finish()
    }
}
