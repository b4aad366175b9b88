//! State keywords that partition booking lists.
//!
//! Keywords are matched case-sensitively through a closed lookup table.
//! Temporal keywords are evaluated against the `now` captured when the
//! query starts.

use chrono::{DateTime, Utc};

use super::{Booking, BookingStatus};

/// Classified state keyword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BookingState {
    /// Every booking.
    #[default]
    All,
    /// `start <= now < end`.
    Current,
    /// `end < now`.
    Past,
    /// `start > now`.
    Future,
    /// Status is `WAITING`.
    Waiting,
    /// Status is `REJECTED`.
    Rejected,
}

const KEYWORDS: [(&str, BookingState); 6] = [
    ("ALL", BookingState::All),
    ("CURRENT", BookingState::Current),
    ("PAST", BookingState::Past),
    ("FUTURE", BookingState::Future),
    ("WAITING", BookingState::Waiting),
    ("REJECTED", BookingState::Rejected),
];

impl BookingState {
    /// Look up a keyword, returning `None` for anything outside the table.
    ///
    /// # Examples
    /// ```
    /// use shareit::domain::BookingState;
    ///
    /// assert_eq!(BookingState::lookup("PAST"), Some(BookingState::Past));
    /// assert_eq!(BookingState::lookup("past"), None);
    /// ```
    #[must_use]
    pub fn lookup(keyword: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(literal, _)| *literal == keyword)
            .map(|(_, state)| *state)
    }

    /// Keyword spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, state)| *state == self)
            .map_or("ALL", |(literal, _)| *literal)
    }
}

/// A state keyword bound to the instant it is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingFilter {
    pub state: BookingState,
    pub now: DateTime<Utc>,
}

impl BookingFilter {
    /// Bind a state to an evaluation instant.
    #[must_use]
    pub fn new(state: BookingState, now: DateTime<Utc>) -> Self {
        Self { state, now }
    }

    /// Whether the booking belongs to this partition.
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        let now = self.now;
        match self.state {
            BookingState::All => true,
            BookingState::Current => booking.start <= now && now < booking.end,
            BookingState::Past => booking.end < now,
            BookingState::Future => booking.start > now,
            BookingState::Waiting => booking.status == BookingStatus::Waiting,
            BookingState::Rejected => booking.status == BookingStatus::Rejected,
        }
    }
}
