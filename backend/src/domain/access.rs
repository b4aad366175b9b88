//! Ownership predicates shared by the booking services.
//!
//! These answer yes or no only; callers choose which error a refusal maps to.

use super::{Booking, Item, UserId};

/// Whether `user_id` owns `item`.
#[must_use]
pub fn is_owner(user_id: UserId, item: &Item) -> bool {
    item.owner_id() == user_id
}

/// Whether `user_id` owns the item reserved by `booking`.
#[must_use]
pub fn is_booking_owner(user_id: UserId, booking: &Booking) -> bool {
    booking.item.owner_id == user_id
}

/// Whether `user_id` made `booking`.
#[must_use]
pub fn is_booker(user_id: UserId, booking: &Booking) -> bool {
    booking.booker_id == user_id
}
