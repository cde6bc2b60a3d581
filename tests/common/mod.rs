//! Scripted SDK client for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use skiff::agent::AgentOptions;
use skiff::client::{AgentClient, ClientConnector};
use skiff::error::{Result, SkiffError};
use skiff::types::{Message, ResultMessage};

/// Call counters shared between a connector and its clients.
#[derive(Default)]
pub struct Counters {
    pub opens: AtomicUsize,
    pub queries: AtomicUsize,
    pub disconnects: AtomicUsize,
}

impl Counters {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

/// One scripted stream item.
#[derive(Clone)]
pub enum ScriptItem {
    Message(Message),
    Error(String),
}

/// Connector handing out clients that replay scripted turns.
pub struct ScriptedConnector {
    turns: Arc<Mutex<VecDeque<Vec<ScriptItem>>>>,
    counters: Arc<Counters>,
    captured_options: Mutex<Option<AgentOptions>>,
}

impl ScriptedConnector {
    pub fn new(turns: Vec<Vec<ScriptItem>>) -> Arc<Self> {
        Arc::new(Self {
            turns: Arc::new(Mutex::new(turns.into())),
            counters: Arc::new(Counters::default()),
            captured_options: Mutex::new(None),
        })
    }

    pub fn counters(&self) -> Arc<Counters> {
        self.counters.clone()
    }

    /// Options the most recent `open` received.
    pub fn captured_options(&self) -> Option<AgentOptions> {
        self.captured_options.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClientConnector for ScriptedConnector {
    async fn open(&self, options: AgentOptions) -> Result<Box<dyn AgentClient>> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        *self.captured_options.lock().unwrap() = Some(options);
        Ok(Box::new(ScriptedClient {
            turns: self.turns.clone(),
            current: VecDeque::new(),
            counters: self.counters.clone(),
        }))
    }
}

struct ScriptedClient {
    turns: Arc<Mutex<VecDeque<Vec<ScriptItem>>>>,
    current: VecDeque<ScriptItem>,
    counters: Arc<Counters>,
}

#[async_trait]
impl AgentClient for ScriptedClient {
    async fn query(&mut self, _prompt: &str) -> Result<()> {
        self.counters.queries.fetch_add(1, Ordering::SeqCst);
        self.current = self
            .turns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default()
            .into();
        Ok(())
    }

    async fn next_message(&mut self) -> Option<Result<Message>> {
        match self.current.pop_front()? {
            ScriptItem::Message(msg) => Some(Ok(msg)),
            ScriptItem::Error(text) => Some(Err(SkiffError::Stream(text))),
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.counters.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Connector whose handshake always fails.
pub struct FailingConnector;

#[async_trait]
impl ClientConnector for FailingConnector {
    async fn open(&self, _options: AgentOptions) -> Result<Box<dyn AgentClient>> {
        Err(SkiffError::Connection("handshake refused".into()))
    }
}

/// A turn of assistant text blocks followed by a result terminator.
pub fn text_turn(texts: &[&str]) -> Vec<ScriptItem> {
    let mut items: Vec<ScriptItem> = texts
        .iter()
        .map(|t| ScriptItem::Message(Message::assistant_text(*t)))
        .collect();
    items.push(ScriptItem::Message(Message::Result(ResultMessage {
        total_cost_usd: None,
        duration_ms: None,
        num_turns: Some(1),
        is_error: false,
    })));
    items
}
