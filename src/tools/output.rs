//! The tool-result content contract.
//!
//! Tool handlers return `{"content": [{"type": "text", "text": ...}]}`.
//! Instead of validating that shape after the fact, [`ToolOutput`] makes a
//! malformed response unrepresentable: construct one via [`ToolOutput::text`]
//! and serde produces exactly the contract shape.

use serde::{Deserialize, Serialize};

/// One content block of a tool response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolContent {
    Text { text: String },
}

/// A structured tool response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Vec<ToolContent>,
}

impl ToolOutput {
    /// A response with a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
        }
    }

    /// A response with multiple text blocks, in order.
    pub fn texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content: texts
                .into_iter()
                .map(|t| ToolContent::Text { text: t.into() })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_output_matches_the_contract_shape() {
        let out = ToolOutput::text("Processed: HELLO (length: 5)");
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "content": [
                    {"type": "text", "text": "Processed: HELLO (length: 5)"}
                ]
            })
        );
    }

    #[test]
    fn multiple_blocks_keep_order() {
        let out = ToolOutput::texts(["first", "second"]);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["content"][0]["text"], "first");
        assert_eq!(json["content"][1]["text"], "second");
    }
}
