//! Acting-user extraction from the `X-Sharer-User-Id` header.
//!
//! The header identifies the caller; whether that user exists is decided by
//! the domain services, not here.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, UserId};

use super::validation::{FieldName, invalid_number_error, missing_field_error};

/// Header naming the acting user.
pub const ACTOR_HEADER: &str = "X-Sharer-User-Id";

const ACTOR_FIELD: FieldName = FieldName::new(ACTOR_HEADER);

/// Acting user for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub UserId);

impl Actor {
    /// The caller's identifier.
    pub fn id(self) -> UserId {
        self.0
    }

    fn from_headers(req: &HttpRequest) -> Result<Self, Error> {
        let raw = req
            .headers()
            .get(ACTOR_HEADER)
            .ok_or_else(|| missing_field_error(ACTOR_FIELD))?;
        let text = raw
            .to_str()
            .map_err(|_| invalid_number_error(ACTOR_FIELD, "<non-ascii>"))?;
        text.trim()
            .parse::<i64>()
            .ok()
            .and_then(|value| UserId::new(value).ok())
            .map(Self)
            .ok_or_else(|| invalid_number_error(ACTOR_FIELD, text))
    }
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req))
    }
}
