//! PostgreSQL-backed `CommentRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{Comment, ItemId, NewComment};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel adapter for item comments.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentPersistenceError {
    map_basic_pool_error(error, CommentPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentPersistenceError {
    map_basic_diesel_error(
        error,
        CommentPersistenceError::query,
        CommentPersistenceError::connection,
    )
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(comments::table)
            .values(&NewCommentRow {
                item_id: comment.item_id.get(),
                author_id: comment.author_id.get(),
                text: &comment.text,
                created_at: comment.created,
            })
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let author_name: String = users::table
            .find(row.author_id)
            .select(users::name)
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row.into_domain(author_name)
            .map_err(CommentPersistenceError::query)
    }

    async fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = comments::table
            .inner_join(users::table)
            .filter(comments::item_id.eq(item_id.get()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((CommentRow::as_select(), users::name))
            .load::<(CommentRow, String)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, author_name)| {
                row.into_domain(author_name)
                    .map_err(CommentPersistenceError::query)
            })
            .collect()
    }
}
