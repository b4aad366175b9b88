//! Booking aggregate and its one-shot approval state machine.
//!
//! A booking reserves an item for a half-open window `[start, end)`. Once
//! stored it is append only: the status is the single mutable field and it
//! moves exactly once, from `WAITING` to `APPROVED` or `REJECTED`.

mod state;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BookingId, ItemId, UserId};

pub use state::{BookingFilter, BookingState};

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Awaiting the owner's decision. Initial state.
    Waiting,
    /// Accepted by the owner. Terminal.
    Approved,
    /// Declined by the owner. Terminal.
    Rejected,
}

impl BookingStatus {
    /// Stored and wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Status an owner's decision moves a waiting booking to.
    #[must_use]
    pub const fn decided(approve: bool) -> Self {
        if approve { Self::Approved } else { Self::Rejected }
    }

    /// Whether no further transition is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Waiting)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised booking status: {0}")]
pub struct ParseBookingStatusError(pub String);

impl FromStr for BookingStatus {
    type Err = ParseBookingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(Self::Waiting),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(ParseBookingStatusError(other.to_owned())),
        }
    }
}

/// Validation errors raised before a booking is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BookingValidationError {
    /// `start` is not strictly before `end`.
    #[error("booking start must be before its end")]
    StartNotBeforeEnd,
    /// `start` lies before the moment of the request.
    #[error("booking start must not be in the past")]
    StartInPast,
    /// `end` lies before the moment of the request.
    #[error("booking end must not be in the past")]
    EndInPast,
}

/// Reservation window checked against the clock at creation time.
///
/// ## Invariants
/// - `start < end`
/// - `start >= now` and `end >= now` for the `now` passed to
///   [`BookingPeriod::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingPeriod {
    /// Validate the window, ordering first and then against `now`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, Utc};
    /// use shareit::domain::{BookingPeriod, BookingValidationError};
    ///
    /// let now = Utc::now();
    /// let later = now + Duration::hours(2);
    /// assert!(BookingPeriod::new(now + Duration::hours(1), later, now).is_ok());
    /// assert_eq!(
    ///     BookingPeriod::new(later, later, now),
    ///     Err(BookingValidationError::StartNotBeforeEnd)
    /// );
    /// ```
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self, BookingValidationError> {
        if start >= end {
            return Err(BookingValidationError::StartNotBeforeEnd);
        }
        if start < now {
            return Err(BookingValidationError::StartInPast);
        }
        if end < now {
            return Err(BookingValidationError::EndInPast);
        }
        Ok(Self { start, end })
    }

    /// Inclusive start.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// Booking ready to be inserted. Its status is always `WAITING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub item_id: ItemId,
    pub booker_id: UserId,
    pub period: BookingPeriod,
}

impl NewBooking {
    /// Status every new booking starts in.
    #[must_use]
    pub const fn status(&self) -> BookingStatus {
        BookingStatus::Waiting
    }
}

/// Item fields a booking is presented and filtered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedItem {
    pub id: ItemId,
    pub name: String,
    pub owner_id: UserId,
}

/// Stored booking joined with the item it reserves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub booker_id: UserId,
    pub item: BookedItem,
}

impl Booking {
    /// Ordering used by every booking list: latest start first, then the
    /// higher id first so equal starts stay deterministic.
    #[must_use]
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.start.cmp(&a.start).then_with(|| b.id.cmp(&a.id))
    }
}
