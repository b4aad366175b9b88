//! PostgreSQL-backed `UserRepository`.
//!
//! Deletion relies on the foreign keys from `items`, `bookings` and
//! `comments`: a violation means the user is still referenced and the row
//! stays.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRemoval, UserRepository};
use crate::domain::{NewUser, User, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel adapter for the user directory.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(users::table)
            .values(&NewUserRow {
                name: user.name(),
                email: user.email(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain().map_err(UserPersistenceError::query)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserRow::into_domain)
            .transpose()
            .map_err(UserPersistenceError::query)
    }

    async fn exists(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(users::table.find(id.get())))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(UserRow::into_domain)
            .collect::<Result<Vec<_>, String>>()
            .map_err(UserPersistenceError::query)
    }

    async fn update(&self, user: User) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(users::table.find(user.id().get()))
            .set((users::name.eq(user.name()), users::email.eq(user.email())))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserRow::into_domain)
            .transpose()
            .map_err(UserPersistenceError::query)
    }

    async fn delete(&self, id: UserId) -> Result<UserRemoval, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        match diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
        {
            Ok(0) => Ok(UserRemoval::Missing),
            Ok(_) => Ok(UserRemoval::Removed),
            Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info)) => {
                debug!(user_id = %id, constraint = ?info.constraint_name(), "user still referenced");
                Ok(UserRemoval::Referenced)
            }
            Err(error) => Err(map_diesel_error(error)),
        }
    }
}
