//! Port abstraction for the user directory and its errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Outcome of [`UserRepository::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRemoval {
    Removed,
    Missing,
    /// Items, bookings or comments still point at the user; nothing changed.
    Referenced,
}

/// Read and register users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and return it with its assigned identifier.
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Whether a user with this identifier exists.
    async fn exists(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Every user, ordered by identifier.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Overwrite a stored user's fields. `None` when the id is unknown.
    async fn update(&self, user: User) -> Result<Option<User>, UserPersistenceError>;

    /// Remove a user nothing else references.
    async fn delete(&self, id: UserId) -> Result<UserRemoval, UserPersistenceError>;
}

/// Fixture directory in which every lookup misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, _user: NewUser) -> Result<User, UserPersistenceError> {
        Err(UserPersistenceError::query("fixture directory is read-only"))
    }

    async fn find_by_id(&self, _id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn exists(&self, _id: UserId) -> Result<bool, UserPersistenceError> {
        Ok(false)
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(Vec::new())
    }

    async fn update(&self, _user: User) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn delete(&self, _id: UserId) -> Result<UserRemoval, UserPersistenceError> {
        Ok(UserRemoval::Missing)
    }
}
