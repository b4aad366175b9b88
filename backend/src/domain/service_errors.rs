//! Mapping from driven-port errors to domain errors.
//!
//! Connection failures become `service_unavailable`; anything else a store
//! reports becomes `internal_error` and is redacted at the HTTP boundary.

use tracing::error;

use crate::domain::Error;
use crate::domain::ports::{
    BookingRepositoryError, CommentPersistenceError, ItemPersistenceError, UserPersistenceError,
};

pub(crate) fn map_user_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user directory query failed");
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

pub(crate) fn map_item_error(err: ItemPersistenceError) -> Error {
    match err {
        ItemPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("item catalogue unavailable: {message}"))
        }
        ItemPersistenceError::Query { message } => {
            error!(%message, "item catalogue query failed");
            Error::internal(format!("item catalogue error: {message}"))
        }
    }
}

pub(crate) fn map_booking_error(err: BookingRepositoryError) -> Error {
    match err {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking store unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            error!(%message, "booking store query failed");
            Error::internal(format!("booking store error: {message}"))
        }
    }
}

pub(crate) fn map_comment_error(err: CommentPersistenceError) -> Error {
    match err {
        CommentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("comment store unavailable: {message}"))
        }
        CommentPersistenceError::Query { message } => {
            error!(%message, "comment store query failed");
            Error::internal(format!("comment store error: {message}"))
        }
    }
}
