//! Shared request validation helpers for the HTTP adapter.
//!
//! Every failure is an `invalid_request` error whose details name the
//! offending field, the raw value when there is one, and a stable code.

use chrono::{DateTime, NaiveDateTime, Utc};
use pagination::{PageRequest, PageRequestError};
use serde_json::json;

use crate::domain::Error;

/// Validation error codes carried in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidNumber,
    InvalidTimestamp,
    OutOfRange,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::OutOfRange => "out_of_range",
        }
    }
}

/// Name of a request field as clients spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_number_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a positive integer"))
        .with_value(ErrorCode::InvalidNumber, value)
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(
        field,
        format!("{name} must be an RFC 3339 timestamp or YYYY-MM-DDTHH:MM:SS"),
    )
    .with_value(ErrorCode::InvalidTimestamp, value)
}

/// Parse an RFC 3339 timestamp, or a zone-less `YYYY-MM-DDTHH:MM:SS[.f]`
/// read as UTC.
pub(crate) fn parse_timestamp(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| invalid_timestamp_error(field, value))
}

/// Require a present field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) const FROM: FieldName = FieldName::new("from");
pub(crate) const SIZE: FieldName = FieldName::new("size");

/// Build a page window from optional `from`/`size` query values.
pub(crate) fn page_request(from: Option<i64>, size: Option<i64>) -> Result<PageRequest, Error> {
    let defaults = PageRequest::default();
    let from = from.unwrap_or(defaults.offset());
    let size = size.unwrap_or(defaults.limit());
    PageRequest::new(from, size).map_err(|err| {
        let (field, value) = match err {
            PageRequestError::NegativeOffset { from } => (FROM, from),
            PageRequestError::NonPositiveSize { size } => (SIZE, size),
        };
        ValidationError::new(field, err.to_string())
            .with_value(ErrorCode::OutOfRange, value.to_string())
    })
}
