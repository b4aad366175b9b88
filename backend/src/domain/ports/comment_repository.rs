//! Port for item comment storage.
use async_trait::async_trait;

use crate::domain::{Comment, ItemId, NewComment};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

/// Store and list item comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Store a comment and return it joined with the author's name.
    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentPersistenceError>;

    /// Comments on one item, oldest first.
    async fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Comment>, CommentPersistenceError>;
}

/// Fixture store without comments.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommentRepository;

#[async_trait]
impl CommentRepository for FixtureCommentRepository {
    async fn insert(&self, _comment: NewComment) -> Result<Comment, CommentPersistenceError> {
        Err(CommentPersistenceError::query("fixture store is read-only"))
    }

    async fn list_for_item(&self, _item_id: ItemId) -> Result<Vec<Comment>, CommentPersistenceError> {
        Ok(Vec::new())
    }
}
