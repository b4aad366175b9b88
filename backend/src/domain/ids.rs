//! Store-assigned numeric identifiers.
//!
//! Each entity carries its own newtype so a booking id can never be passed
//! where an item id is expected. Identifiers are positive; the store assigns
//! them on insert.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error returned when an identifier is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be positive (got {value})")]
pub struct InvalidId {
    /// Rejected raw value.
    pub value: i64,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
        )]
        #[serde(try_from = "i64", into = "i64")]
        #[schema(value_type = i64, example = 1)]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub const fn new(value: i64) -> Result<Self, InvalidId> {
                if value <= 0 {
                    return Err(InvalidId { value });
                }
                Ok(Self(value))
            }

            /// Raw numeric value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = InvalidId;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id!(
    /// Identifier of a registered user.
    UserId
);
define_id!(
    /// Identifier of a catalogued item.
    ItemId
);
define_id!(
    /// Identifier of a booking.
    BookingId
);
define_id!(
    /// Identifier of an item comment.
    CommentId
);
