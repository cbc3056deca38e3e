//! Todo item, the only persisted record, and the shapes used to change it.

use serde::{Deserialize, Serialize};

use crate::error::{ForbiddenError, ValidationError};
use crate::id::TodoId;
use crate::time::Timestamp;

/// A stored todo record. Either present with every field, or absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub name: String,
    pub description: String,
    /// Time of the most recent successful create or update.
    #[serde(with = "crate::time::text")]
    pub timestamp: Timestamp,
}

impl TodoItem {
    /// Assemble a new record from client-editable fields plus server-assigned
    /// identity and time.
    #[must_use]
    pub fn new(id: TodoId, draft: TodoDraft, timestamp: Timestamp) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            timestamp,
        }
    }
}

/// The fields a client is allowed to set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub name: String,
    pub description: String,
}

impl TodoDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Attach the update time, producing the full set of overwritten fields.
    #[must_use]
    pub fn stamped(self, timestamp: Timestamp) -> TodoChanges {
        TodoChanges {
            name: self.name,
            description: self.description,
            timestamp,
        }
    }
}

/// Everything an update overwrites. The identifier is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    pub name: String,
    pub description: String,
    pub timestamp: Timestamp,
}

/// Inbound JSON body for create and update requests.
///
/// Every field is optional; missing or `null` strings become empty. Unknown
/// fields, including `timestamp`, are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TodoPayload {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
}

impl TodoPayload {
    /// Decode a request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedPayload`] when `body` is not a JSON
    /// object matching the payload shape.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        // Only a JSON object is a payload, never a positional array.
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(body)?;
        Ok(serde_json::from_value(serde_json::Value::Object(object))?)
    }

    /// Fields for a new record. A client-supplied `id` is discarded.
    #[must_use]
    pub fn into_create(self) -> TodoDraft {
        TodoDraft::new(
            self.name.unwrap_or_default(),
            self.description.unwrap_or_default(),
        )
    }

    /// Fields for an update.
    ///
    /// # Errors
    ///
    /// Returns [`ForbiddenError::IdMutation`] when the payload carries a
    /// non-empty `id`, whatever the other fields hold.
    pub fn into_update(self) -> Result<TodoDraft, ForbiddenError> {
        if self.id.as_deref().is_some_and(|id| !id.is_empty()) {
            return Err(ForbiddenError::IdMutation);
        }
        Ok(self.into_create())
    }
}
