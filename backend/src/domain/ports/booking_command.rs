//! Driving port for booking mutations.
//!
//! Creating a booking and deciding on it are the only two write paths the
//! booking lifecycle exposes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Booking, BookingId, Error, ItemId, UserId};

/// Request to reserve an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingRequest {
    pub actor: UserId,
    pub item_id: ItemId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Owner decision on a waiting booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetApprovalRequest {
    pub actor: UserId,
    pub booking_id: BookingId,
    pub approve: bool,
}

/// Driving port for booking write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Validate and store a new `WAITING` booking.
    ///
    /// Checks run in a fixed order and stop at the first failure: window
    /// ordering, window against the clock, booker exists, item exists,
    /// booker is not the owner, item is available.
    async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking, Error>;

    /// Move a `WAITING` booking to `APPROVED` or `REJECTED`.
    async fn set_approval(&self, request: SetApprovalRequest) -> Result<Booking, Error>;
}
