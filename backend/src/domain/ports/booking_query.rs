//! Driving port for booking reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Booking, BookingId, Error, UserId};

/// Request to read one booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetBookingRequest {
    pub actor: UserId,
    pub booking_id: BookingId,
}

/// Request for a state-partitioned page of bookings.
///
/// `state` carries the raw keyword so the service can echo unknown values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBookingsRequest {
    pub actor: UserId,
    pub state: String,
    pub page: PageRequest,
}

/// Driving port for booking read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Read a booking visible to its booker or the item's owner.
    ///
    /// Anyone else gets the same not-found error as for a missing booking.
    async fn get_booking(&self, request: GetBookingRequest) -> Result<Booking, Error>;

    /// Bookings the actor made.
    async fn list_for_booker(&self, request: ListBookingsRequest) -> Result<Vec<Booking>, Error>;

    /// Bookings on items the actor owns.
    async fn list_for_owner(&self, request: ListBookingsRequest) -> Result<Vec<Booking>, Error>;
}
