//! Registered users.
//!
//! Users are the collaborators the booking core reads by id. The directory
//! only validates the fields it stores.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Validation errors returned by [`NewUser::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    EmptyEmail,
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must contain '@'"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Validated registration data awaiting an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    /// Validate registration fields.
    ///
    /// # Examples
    /// ```
    /// use shareit::domain::NewUser;
    ///
    /// assert!(NewUser::new("Ada", "ada@example.com").is_ok());
    /// assert!(NewUser::new("Ada", "nope").is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        let email = email.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self {
            name: name.trim().to_owned(),
            email: email.trim().to_owned(),
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Attach the store-assigned identifier.
    #[must_use]
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

/// Profile edits. Absent or blank fields keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
}

impl User {
    /// Identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Apply profile edits, re-validating a replacement email.
    pub fn patched(self, patch: UserPatch) -> Result<Self, UserValidationError> {
        let name = patch
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(self.name);
        let email = patch
            .email
            .filter(|email| !email.trim().is_empty())
            .unwrap_or(self.email);
        NewUser::new(name, email).map(|user| user.with_id(self.id))
    }
}
