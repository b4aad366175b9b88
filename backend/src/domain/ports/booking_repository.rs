//! Port for booking persistence and filtered, windowed booking reads.
//!
//! Adapters own ordering: every list is sorted by start descending, then id
//! descending, before the page window is applied.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::{
    Booking, BookingFilter, BookingId, BookingStatus, ItemId, NewBooking, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "booking repository query failed: {message}",
    }
}

/// Outcome of a conditional status write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTransition {
    /// The stored status matched and was replaced.
    Applied(Booking),
    /// The stored status differed; nothing was written.
    Conflict {
        /// Status found in the store.
        observed: BookingStatus,
    },
    /// No booking has this identifier.
    Missing,
}

/// Port for storing and querying bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Store a new `WAITING` booking and return it with its identifier.
    ///
    /// The referenced item must exist.
    async fn insert(&self, booking: NewBooking) -> Result<Booking, BookingRepositoryError>;

    /// Fetch a booking by identifier.
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Atomically replace the status when it currently equals `from`.
    ///
    /// Of two racing calls with the same `from`, at most one observes
    /// [`StatusTransition::Applied`].
    async fn transition_status(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<StatusTransition, BookingRepositoryError>;

    /// Bookings made by `booker_id` that match `filter`, newest first.
    async fn list_for_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// Bookings on items owned by `owner_id` that match `filter`, newest first.
    async fn list_for_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// Every booking of one item, newest first.
    async fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// Whether `booker_id` holds a booking on `item_id` that ended before
    /// `now`.
    async fn has_finished_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<bool, BookingRepositoryError>;
}

/// Fixture store that holds no bookings.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookingRepository;

#[async_trait]
impl BookingRepository for FixtureBookingRepository {
    async fn insert(&self, _booking: NewBooking) -> Result<Booking, BookingRepositoryError> {
        Err(BookingRepositoryError::query("fixture store is read-only"))
    }

    async fn find_by_id(&self, _id: BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(None)
    }

    async fn transition_status(
        &self,
        _id: BookingId,
        _from: BookingStatus,
        _to: BookingStatus,
    ) -> Result<StatusTransition, BookingRepositoryError> {
        Ok(StatusTransition::Missing)
    }

    async fn list_for_booker(
        &self,
        _booker_id: UserId,
        _filter: BookingFilter,
        _page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_owner(
        &self,
        _owner_id: UserId,
        _filter: BookingFilter,
        _page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_item(&self, _item_id: ItemId) -> Result<Vec<Booking>, BookingRepositoryError> {
        Ok(Vec::new())
    }

    async fn has_finished_booking(
        &self,
        _booker_id: UserId,
        _item_id: ItemId,
        _now: DateTime<Utc>,
    ) -> Result<bool, BookingRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_transition_reports_missing() {
        let repo = FixtureBookingRepository;
        let outcome = repo
            .transition_status(
                BookingId::new(1).expect("positive id"),
                BookingStatus::Waiting,
                BookingStatus::Approved,
            )
            .await
            .expect("fixture transition succeeds");
        assert_eq!(outcome, StatusTransition::Missing);
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = BookingRepositoryError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
    }
}
