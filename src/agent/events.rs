use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::visualization::Visualization;

/// Who produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventRole {
    User,
    Model,
    Tool,
}

/// Payload of a turn event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPart {
    /// Free text from the user or the model.
    Text { text: String },
    /// The model asked for a function to be invoked.
    FunctionCall { name: String, args: Value },
    /// Result of an invoked function.
    FunctionResponse {
        name: String,
        response: Value,
        /// Set when the function wrote a visualization file.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        visualization: Option<Visualization>,
    },
}

/// One entry in the ordered record of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub id: Uuid,
    /// `user` or the name of the agent that was active.
    pub author: String,
    pub role: EventRole,
    pub part: EventPart,
    pub timestamp: DateTime<Utc>,
}

impl TurnEvent {
    fn new(author: impl Into<String>, role: EventRole, part: EventPart) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: author.into(),
            role,
            part,
            timestamp: Utc::now(),
        }
    }

    /// The user's message opening the turn
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new("user", EventRole::User, EventPart::Text { text: text.into() })
    }

    /// Text produced by an agent
    pub fn model_text(author: &str, text: impl Into<String>) -> Self {
        Self::new(author, EventRole::Model, EventPart::Text { text: text.into() })
    }

    /// A function call requested by an agent
    pub fn function_call(author: &str, name: impl Into<String>, args: Value) -> Self {
        Self::new(
            author,
            EventRole::Model,
            EventPart::FunctionCall {
                name: name.into(),
                args,
            },
        )
    }

    /// The result of a function call
    pub fn function_response(
        author: &str,
        name: impl Into<String>,
        response: Value,
        visualization: Option<Visualization>,
    ) -> Self {
        Self::new(
            author,
            EventRole::Tool,
            EventPart::FunctionResponse {
                name: name.into(),
                response,
                visualization,
            },
        )
    }
}
