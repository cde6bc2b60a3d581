//! Interactive console loop over an [`AgentAdapter`].

use std::pin::pin;

use futures::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::adapter::AgentAdapter;
use crate::error::Result;
use crate::types::{ContentBlock, Message};

/// Inputs that end the conversation (matched case-insensitively).
const FAREWELL_COMMANDS: [&str; 4] = ["quit", "exit", "bye", "goodbye"];

/// Read-print conversation loop for one agent.
pub struct InteractiveAgent {
    adapter: AgentAdapter,
}

impl InteractiveAgent {
    pub fn new(adapter: AgentAdapter) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &AgentAdapter {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut AgentAdapter {
        &mut self.adapter
    }

    pub fn into_adapter(self) -> AgentAdapter {
        self.adapter
    }

    fn agent_name(&self) -> String {
        self.adapter
            .config()
            .name
            .clone()
            .unwrap_or_else(|| "Agent".to_string())
    }

    /// Run the loop on stdin/stdout.
    ///
    /// An interrupt (ctrl-c) during the input read or the response stream
    /// prints the farewell and exits the loop; the disconnect path runs in
    /// every case.
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let name = self.agent_name();

        let result = tokio::select! {
            result = self.run_with(stdin, &mut stdout) => result,
            _ = tokio::signal::ctrl_c() => {
                println!("\n\n👋 {name}: Goodbye! (interrupted)");
                Ok(())
            }
        };

        self.adapter.disconnect().await?;
        result
    }

    /// Run the loop over arbitrary line-oriented input and output.
    ///
    /// A turn-level error is reported to the user and the loop continues;
    /// one failed turn never terminates the conversation.
    pub async fn run_with<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let name = self.agent_name();
        let separator = "=".repeat(60);

        out.write_all(format!("\n{separator}\n").as_bytes()).await?;
        out.write_all(format!("  {} - Interactive Mode\n", name.to_uppercase()).as_bytes())
            .await?;
        out.write_all(format!("{separator}\n").as_bytes()).await?;
        out.write_all(
            format!("\nHello! I'm {name}. Type 'quit' or 'exit' to end our conversation.\n")
                .as_bytes(),
        )
        .await?;
        if let Some(description) = &self.adapter.config().description {
            out.write_all(format!("\n{description}\n").as_bytes()).await?;
        }

        let mut lines = input.lines();
        loop {
            out.write_all("\n💬 You: ".as_bytes()).await?;
            out.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if FAREWELL_COMMANDS.contains(&trimmed.to_lowercase().as_str()) {
                out.write_all(
                    format!("\n👋 {name}: Goodbye! Thanks for chatting.\n").as_bytes(),
                )
                .await?;
                break;
            }

            if let Err(e) = self.run_turn(trimmed, out).await {
                tracing::error!(error = %e, "error processing input");
                out.write_all(
                    format!("\n❌ Sorry, I encountered an error: {e}\n").as_bytes(),
                )
                .await?;
            }
        }

        self.adapter.disconnect().await?;
        Ok(())
    }

    async fn run_turn<W>(&mut self, prompt: &str, out: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let name = self.agent_name();
        let mut stream = pin!(self.adapter.query(prompt).await?);
        while let Some(message) = stream.next().await {
            display(&name, &message?, out).await?;
        }
        Ok(())
    }
}

/// Render one message in human-readable form.
///
/// Assistant text prints as-is; a tool invocation prints its name and input
/// arguments; a result message prints cost and duration when present.
/// Tool-result messages are not rendered.
async fn display<W>(name: &str, message: &Message, out: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    match message {
        Message::Assistant(msg) => {
            for block in &msg.content {
                match block {
                    ContentBlock::Text { text } => {
                        out.write_all(format!("\n🤖 {name}: {text}\n").as_bytes()).await?;
                    }
                    ContentBlock::ToolUse { name: tool, input, .. } => {
                        out.write_all(format!("\n🔧 Using tool: {tool}\n").as_bytes()).await?;
                        if !input.is_null() {
                            out.write_all(format!("   Input: {input}\n").as_bytes()).await?;
                        }
                    }
                }
            }
        }
        Message::ToolResult(_) => {}
        Message::Result(result) => {
            if let Some(cost) = result.total_cost_usd {
                if cost > 0.0 {
                    out.write_all(format!("\n💰 Cost: ${cost:.4}\n").as_bytes()).await?;
                }
            }
            if let Some(ms) = result.duration_ms {
                if ms > 0 {
                    out.write_all(format!("⏱️  Duration: {ms}ms\n").as_bytes()).await?;
                }
            }
        }
    }
    Ok(())
}
