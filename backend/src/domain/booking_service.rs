//! Booking lifecycle service.
//!
//! Implements the [`BookingCommand`] driving port: validated creation of
//! `WAITING` bookings and the single owner decision that moves a booking to
//! a terminal status.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::access::{is_booking_owner, is_owner};
use crate::domain::ports::{
    BookingCommand, BookingRepository, CreateBookingRequest, ItemRepository, SetApprovalRequest,
    StatusTransition, UserRepository,
};
use crate::domain::service_errors::{map_booking_error, map_item_error, map_user_error};
use crate::domain::{
    Booking, BookingId, BookingPeriod, BookingStatus, BookingValidationError, Error, NewBooking,
    UserId,
};

fn validation_error(err: BookingValidationError) -> Error {
    let field = match err {
        BookingValidationError::StartNotBeforeEnd | BookingValidationError::StartInPast => "start",
        BookingValidationError::EndInPast => "end",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn already_decided(id: BookingId, status: BookingStatus) -> Error {
    Error::state_conflict(format!("booking {id} is already {status}"))
        .with_details(json!({ "bookingId": id, "status": status }))
}

/// Booking service implementing the lifecycle command port.
#[derive(Clone)]
pub struct BookingService<U, I, B> {
    users: Arc<U>,
    items: Arc<I>,
    bookings: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<U, I, B> BookingService<U, I, B> {
    /// Create a service over the user directory, catalogue, and booking store.
    pub fn new(users: Arc<U>, items: Arc<I>, bookings: Arc<B>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            items,
            bookings,
            clock,
        }
    }
}

impl<U, I, B> BookingService<U, I, B>
where
    U: UserRepository,
{
    async fn require_user(&self, id: UserId) -> Result<(), Error> {
        let exists = self.users.exists(id).await.map_err(map_user_error)?;
        if exists {
            Ok(())
        } else {
            Err(Error::not_found(format!("user {id} not found")))
        }
    }
}

#[async_trait]
impl<U, I, B> BookingCommand for BookingService<U, I, B>
where
    U: UserRepository,
    I: ItemRepository,
    B: BookingRepository,
{
    async fn create_booking(&self, request: CreateBookingRequest) -> Result<Booking, Error> {
        let CreateBookingRequest {
            actor,
            item_id,
            start,
            end,
        } = request;
        let period =
            BookingPeriod::new(start, end, self.clock.utc()).map_err(validation_error)?;

        self.require_user(actor).await?;
        let item = self
            .items
            .find_by_id(item_id)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| Error::not_found(format!("item {item_id} not found")))?;

        if is_owner(actor, &item) {
            debug!(user_id = %actor, item_id = %item_id, "owner tried to book own item");
            return Err(Error::access_denied("owner cannot book own item"));
        }
        if !item.available() {
            return Err(Error::invalid_request(format!("item {item_id} is not available"))
                .with_details(json!({ "field": "itemId" })));
        }

        let booking = self
            .bookings
            .insert(NewBooking {
                item_id,
                booker_id: actor,
                period,
            })
            .await
            .map_err(map_booking_error)?;
        info!(
            booking_id = %booking.id,
            item_id = %item_id,
            booker_id = %actor,
            "booking created"
        );
        Ok(booking)
    }

    async fn set_approval(&self, request: SetApprovalRequest) -> Result<Booking, Error> {
        let SetApprovalRequest {
            actor,
            booking_id,
            approve,
        } = request;
        self.require_user(actor).await?;
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| Error::not_found(format!("booking {booking_id} not found")))?;

        if booking.status.is_terminal() {
            return Err(already_decided(booking_id, booking.status));
        }
        if !is_booking_owner(actor, &booking) {
            debug!(user_id = %actor, booking_id = %booking_id, "non-owner tried to decide booking");
            return Err(Error::access_denied(format!(
                "user {actor} does not own the item of booking {booking_id}"
            )));
        }

        let target = BookingStatus::decided(approve);
        match self
            .bookings
            .transition_status(booking_id, BookingStatus::Waiting, target)
            .await
            .map_err(map_booking_error)?
        {
            StatusTransition::Applied(updated) => {
                info!(booking_id = %booking_id, status = %target, "booking decided");
                Ok(updated)
            }
            StatusTransition::Conflict { observed } => {
                warn!(booking_id = %booking_id, %observed, "concurrent decision lost the race");
                Err(already_decided(booking_id, observed))
            }
            StatusTransition::Missing => {
                Err(Error::not_found(format!("booking {booking_id} not found")))
            }
        }
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
