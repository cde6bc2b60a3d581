//! Skiff: agent runtime adapter.
//!
//! A thin, typed layer between domain-specific chat agents and an external
//! LLM agent SDK. An agent combines a system prompt, a set of named
//! schema-typed tools, and a connected SDK session; one user prompt becomes
//! a finite stream of typed messages (assistant text, tool invocations,
//! tool results, a final result summary).
//!
//! # Quick Start
//!
//! ```no_run
//! use skiff::prelude::*;
//!
//! # async fn example() -> skiff::error::Result<()> {
//! let mut agent = AgentAdapter::new("./my-agent")?
//!     .with_system_prompt("You are a helpful assistant.");
//! let reply = agent.process_message("Hello!").await?;
//! println!("{reply}");
//! agent.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod tools;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
