//! Booking read service.
//!
//! Classifies state keywords against the clock and assembles windowed
//! booking lists for the booker and owner viewpoints. Single-booking reads
//! hide bookings from everyone but their booker and the item's owner.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::access::{is_booker, is_booking_owner};
use crate::domain::ports::{
    BookingQuery, BookingRepository, GetBookingRequest, ListBookingsRequest, UserRepository,
};
use crate::domain::service_errors::{map_booking_error, map_user_error};
use crate::domain::{Booking, BookingFilter, BookingState, Error, UserId};

/// Classify a raw state keyword at the given instant.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use shareit::domain::{BookingState, ErrorCode, classify_state};
///
/// let filter = classify_state("FUTURE", Utc::now()).expect("known keyword");
/// assert_eq!(filter.state, BookingState::Future);
/// let err = classify_state("Future", Utc::now()).expect_err("case sensitive");
/// assert_eq!(err.code(), ErrorCode::UnknownState);
/// ```
pub fn classify_state(
    keyword: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<BookingFilter, Error> {
    BookingState::lookup(keyword)
        .map(|state| BookingFilter::new(state, now))
        .ok_or_else(|| Error::unknown_state(keyword))
}

/// Which side of a booking the list is read from.
#[derive(Debug, Clone, Copy)]
enum Viewpoint {
    Booker,
    Owner,
}

/// Booking service implementing the read port.
#[derive(Clone)]
pub struct BookingQueryService<U, B> {
    users: Arc<U>,
    bookings: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<U, B> BookingQueryService<U, B> {
    /// Create a read service over the user directory and booking store.
    pub fn new(users: Arc<U>, bookings: Arc<B>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            bookings,
            clock,
        }
    }
}

impl<U, B> BookingQueryService<U, B>
where
    U: UserRepository,
    B: BookingRepository,
{
    async fn require_user(&self, id: UserId) -> Result<(), Error> {
        if self.users.exists(id).await.map_err(map_user_error)? {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {id} not found")))
        }
    }

    async fn list(
        &self,
        viewpoint: Viewpoint,
        request: ListBookingsRequest,
    ) -> Result<Vec<Booking>, Error> {
        let ListBookingsRequest { actor, state, page } = request;
        self.require_user(actor).await?;
        let filter = classify_state(&state, self.clock.utc())?;

        let bookings = match viewpoint {
            Viewpoint::Booker => self.bookings.list_for_booker(actor, filter, page).await,
            Viewpoint::Owner => self.bookings.list_for_owner(actor, filter, page).await,
        }
        .map_err(map_booking_error)?;

        debug!(
            user_id = %actor,
            state = filter.state.as_str(),
            ?viewpoint,
            count = bookings.len(),
            "bookings listed"
        );
        Ok(bookings)
    }
}

#[async_trait]
impl<U, B> BookingQuery for BookingQueryService<U, B>
where
    U: UserRepository,
    B: BookingRepository,
{
    async fn get_booking(&self, request: GetBookingRequest) -> Result<Booking, Error> {
        let GetBookingRequest { actor, booking_id } = request;
        let not_found = || Error::not_found(format!("booking {booking_id} not found"));

        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(not_found)?;

        if is_booker(actor, &booking) || is_booking_owner(actor, &booking) {
            Ok(booking)
        } else {
            debug!(user_id = %actor, booking_id = %booking_id, "booking hidden from caller");
            Err(not_found())
        }
    }

    async fn list_for_booker(&self, request: ListBookingsRequest) -> Result<Vec<Booking>, Error> {
        self.list(Viewpoint::Booker, request).await
    }

    async fn list_for_owner(&self, request: ListBookingsRequest) -> Result<Vec<Booking>, Error> {
        self.list(Viewpoint::Owner, request).await
    }
}

#[cfg(test)]
#[path = "booking_query_service_tests.rs"]
mod tests;
