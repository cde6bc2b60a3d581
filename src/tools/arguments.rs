//! Structured argument bag passed to tool handlers.

use serde::de::DeserializeOwned;

use crate::error::{Result, SkiffError};

/// Arguments for one tool invocation, as sent by the SDK.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// The raw argument object.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a required string argument.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| SkiffError::InvalidArgument(format!("missing string argument '{key}'")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Get a required integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64> {
        self.value
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| SkiffError::InvalidArgument(format!("missing integer argument '{key}'")))
    }

    /// Get a required float argument.
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.value
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| SkiffError::InvalidArgument(format!("missing number argument '{key}'")))
    }

    /// Get a required boolean argument.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.value
            .get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| SkiffError::InvalidArgument(format!("missing boolean argument '{key}'")))
    }

    /// Deserialize the whole bag into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.value.clone())
            .map_err(|e| SkiffError::InvalidArgument(e.to_string()))
    }
}
