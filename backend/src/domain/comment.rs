//! Reviews left on items by past borrowers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CommentId, ItemId, UserId};

/// Error raised when comment text is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("comment text must not be empty")]
pub struct EmptyCommentText;

/// Comment awaiting an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub item_id: ItemId,
    pub author_id: UserId,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl NewComment {
    /// Validate the comment text.
    pub fn new(
        item_id: ItemId,
        author_id: UserId,
        text: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Result<Self, EmptyCommentText> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(EmptyCommentText);
        }
        Ok(Self {
            item_id,
            author_id,
            text,
            created,
        })
    }
}

/// Stored comment, joined with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub item_id: ItemId,
    pub author_id: UserId,
    pub author_name: String,
    pub text: String,
    pub created: DateTime<Utc>,
}
