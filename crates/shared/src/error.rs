use serde::{Deserialize, Serialize};

/// Rejection body returned by the routes API on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    /// Server-provided reason, or `fallback` when the body carried none.
    /// Blank reasons count as missing.
    pub fn message_or(self, fallback: &str) -> String {
        self.error
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}
