//! Console loop tests driven through injected input and output buffers.

mod common;

use common::{text_turn, ScriptItem, ScriptedConnector};
use pretty_assertions::assert_eq;
use skiff::agent::{AgentAdapter, InteractiveAgent};
use skiff::types::{AssistantMessage, ContentBlock, Message, ResultMessage};
use tempfile::TempDir;

async fn run_session(
    connector: std::sync::Arc<ScriptedConnector>,
    dir: &TempDir,
    input: &str,
) -> String {
    let adapter = AgentAdapter::new(dir.path())
        .unwrap()
        .with_connector(connector);
    let mut agent = InteractiveAgent::new(adapter);

    let mut out: Vec<u8> = Vec::new();
    agent
        .run_with(input.as_bytes(), &mut out)
        .await
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn quit_ends_the_session_without_querying() {
    let dir = TempDir::new().unwrap();
    let connector = ScriptedConnector::new(vec![text_turn(&["should not appear"])]);
    let counters = connector.counters();

    let output = run_session(connector, &dir, "quit\n").await;

    assert_eq!(counters.queries(), 0);
    assert!(output.contains("👋 Agent: Goodbye! Thanks for chatting."));
    assert!(!output.contains("should not appear"));
}

#[tokio::test]
async fn farewell_commands_match_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let connector = ScriptedConnector::new(vec![]);
    let counters = connector.counters();

    let output = run_session(connector, &dir, "GOODBYE\n").await;

    assert_eq!(counters.queries(), 0);
    assert!(output.contains("Goodbye! Thanks for chatting."));
}

#[tokio::test]
async fn empty_lines_are_skipped() {
    let dir = TempDir::new().unwrap();
    let connector = ScriptedConnector::new(vec![text_turn(&["hello there"])]);
    let counters = connector.counters();

    let output = run_session(connector, &dir, "\n   \nhi\nexit\n").await;

    assert_eq!(counters.queries(), 1);
    assert!(output.contains("🤖 Agent: hello there"));
}

#[tokio::test]
async fn banner_shows_name_and_description() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "name: librarian\ndescription: Finds and summarizes documents.\n",
    )
    .unwrap();
    let connector = ScriptedConnector::new(vec![]);

    let output = run_session(connector, &dir, "quit\n").await;

    assert!(output.contains("LIBRARIAN - Interactive Mode"));
    assert!(output.contains("Hello! I'm librarian."));
    assert!(output.contains("Finds and summarizes documents."));
    assert!(output.contains("👋 librarian: Goodbye!"));
}

#[tokio::test]
async fn a_turn_renders_text_tool_use_and_metrics() {
    let dir = TempDir::new().unwrap();
    let turn = vec![
        ScriptItem::Message(Message::Assistant(AssistantMessage {
            content: vec![
                ContentBlock::Text {
                    text: "Let me check.".into(),
                },
                ContentBlock::ToolUse {
                    id: "c1".into(),
                    name: "lookup".into(),
                    input: serde_json::json!({"key": "widgets"}),
                },
            ],
            model: None,
        })),
        ScriptItem::Message(Message::assistant_text("Found 3 widgets.")),
        ScriptItem::Message(Message::Result(ResultMessage {
            total_cost_usd: Some(0.0234),
            duration_ms: Some(1500),
            num_turns: Some(2),
            is_error: false,
        })),
    ];
    let connector = ScriptedConnector::new(vec![turn]);

    let output = run_session(connector, &dir, "how many widgets?\nquit\n").await;

    assert!(output.contains("🤖 Agent: Let me check."));
    assert!(output.contains("🔧 Using tool: lookup"));
    assert!(output.contains(r#"Input: {"key":"widgets"}"#));
    assert!(output.contains("🤖 Agent: Found 3 widgets."));
    assert!(output.contains("💰 Cost: $0.0234"));
    assert!(output.contains("⏱️  Duration: 1500ms"));
}

#[tokio::test]
async fn zero_metrics_are_not_rendered() {
    let dir = TempDir::new().unwrap();
    let turn = vec![
        ScriptItem::Message(Message::assistant_text("done")),
        ScriptItem::Message(Message::Result(ResultMessage {
            total_cost_usd: Some(0.0),
            duration_ms: Some(0),
            num_turns: Some(1),
            is_error: false,
        })),
    ];
    let connector = ScriptedConnector::new(vec![turn]);

    let output = run_session(connector, &dir, "hi\nquit\n").await;

    assert!(!output.contains("💰"));
    assert!(!output.contains("⏱️"));
}

#[tokio::test]
async fn a_failed_turn_is_reported_and_the_loop_continues() {
    let dir = TempDir::new().unwrap();
    let connector = ScriptedConnector::new(vec![
        vec![ScriptItem::Error("backend went away".into())],
        text_turn(&["back again"]),
    ]);
    let counters = connector.counters();

    let output = run_session(connector, &dir, "first\nsecond\nquit\n").await;

    assert_eq!(counters.queries(), 2);
    assert!(output.contains("❌ Sorry, I encountered an error: "));
    assert!(output.contains("backend went away"));
    assert!(output.contains("🤖 Agent: back again"));
    assert!(output.contains("Goodbye! Thanks for chatting."));
}

#[tokio::test]
async fn end_of_input_ends_the_loop_and_disconnects() {
    let dir = TempDir::new().unwrap();
    let connector = ScriptedConnector::new(vec![text_turn(&["reply"])]);
    let counters = connector.counters();

    let output = run_session(connector, &dir, "hi\n").await;

    assert_eq!(counters.queries(), 1);
    assert_eq!(counters.disconnects(), 1);
    assert!(output.contains("🤖 Agent: reply"));
}

#[tokio::test]
async fn farewell_disconnects_the_session() {
    let dir = TempDir::new().unwrap();
    let connector = ScriptedConnector::new(vec![text_turn(&["reply"])]);
    let counters = connector.counters();

    run_session(connector, &dir, "hi\nbye\n").await;

    assert_eq!(counters.disconnects(), 1);
}
