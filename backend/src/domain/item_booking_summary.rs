//! Last and next booking of an item relative to now.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::access::is_owner;
use crate::domain::ports::BookingRepository;
use crate::domain::service_errors::map_booking_error;
use crate::domain::{Booking, Error, Item, UserId};

/// Most recent started booking and earliest upcoming booking of an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemBookingSummary {
    pub last: Option<Booking>,
    pub next: Option<Booking>,
}

/// Summarise `bookings` of an item owned by `owner_id` as seen by `viewer`.
///
/// `last` is the booking with the latest `start <= now`; `next` the one with
/// the earliest `start > now`. A viewer who is not the owner never sees their
/// own bookings in either slot.
#[must_use]
pub fn summarize_bookings(
    bookings: &[Booking],
    owner_id: UserId,
    viewer: UserId,
    now: DateTime<Utc>,
) -> ItemBookingSummary {
    let visible = || {
        bookings
            .iter()
            .filter(move |booking| viewer == owner_id || booking.booker_id != viewer)
    };

    let last = visible()
        .filter(|booking| booking.start <= now)
        .max_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)))
        .cloned();
    let next = visible()
        .filter(|booking| booking.start > now)
        .min_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)))
        .cloned();

    ItemBookingSummary { last, next }
}

/// Reads an item's bookings and derives its summary. Creates nothing.
#[derive(Clone)]
pub struct ItemBookingSummarizer<B> {
    bookings: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<B> ItemBookingSummarizer<B>
where
    B: BookingRepository,
{
    /// Create a summarizer over the booking store.
    pub fn new(bookings: Arc<B>, clock: Arc<dyn Clock>) -> Self {
        Self { bookings, clock }
    }

    /// Summary of `item` for `viewer`. Items without bookings yield an empty
    /// summary.
    pub async fn summarize(&self, item: &Item, viewer: UserId) -> Result<ItemBookingSummary, Error> {
        let bookings = self
            .bookings
            .list_for_item(item.id())
            .await
            .map_err(map_booking_error)?;
        Ok(summarize_bookings(
            &bookings,
            item.owner_id(),
            viewer,
            self.clock.utc(),
        ))
    }

    /// Summary shown on the item detail view: populated for the owner only.
    pub async fn summarize_for_owner(
        &self,
        item: &Item,
        viewer: UserId,
    ) -> Result<ItemBookingSummary, Error> {
        if is_owner(viewer, item) {
            self.summarize(item, viewer).await
        } else {
            Ok(ItemBookingSummary::default())
        }
    }
}
