//! In-memory adapter implementing every repository port.
//!
//! All tables live behind one mutex, so each port call, including the
//! conditional status write, runs as a single atomic step. Identifiers come
//! from per-table sequences starting at 1.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, CommentPersistenceError, CommentRepository,
    ItemPersistenceError, ItemRepository, StatusTransition, UserPersistenceError, UserRemoval,
    UserRepository,
};
use crate::domain::{
    BookedItem, Booking, BookingFilter, BookingId, BookingStatus, Comment, CommentId, InvalidId,
    Item, ItemId, NewBooking, NewComment, NewItem, NewUser, User, UserId,
};

#[derive(Debug, Clone)]
struct BookingRow {
    id: BookingId,
    item_id: ItemId,
    booker_id: UserId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: BookingStatus,
}

#[derive(Debug, Clone)]
struct CommentRow {
    id: CommentId,
    item_id: ItemId,
    author_id: UserId,
    text: String,
    created: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    items: BTreeMap<ItemId, Item>,
    bookings: BTreeMap<BookingId, BookingRow>,
    comments: Vec<CommentRow>,
    last_user: i64,
    last_item: i64,
    last_booking: i64,
    last_comment: i64,
}

fn next_id<T>(counter: &mut i64, wrap: fn(i64) -> Result<T, InvalidId>) -> Result<T, String> {
    *counter = counter
        .checked_add(1)
        .ok_or_else(|| "identifier sequence exhausted".to_owned())?;
    wrap(*counter).map_err(|err| err.to_string())
}

impl Tables {
    fn join(&self, row: &BookingRow) -> Option<Booking> {
        let item = self.items.get(&row.item_id)?;
        Some(Booking {
            id: row.id,
            start: row.start,
            end: row.end,
            status: row.status,
            booker_id: row.booker_id,
            item: BookedItem {
                id: item.id(),
                name: item.name().to_owned(),
                owner_id: item.owner_id(),
            },
        })
    }

    fn select<P>(&self, predicate: P) -> Vec<Booking>
    where
        P: Fn(&Booking) -> bool,
    {
        let mut selected: Vec<Booking> = self
            .bookings
            .values()
            .filter_map(|row| self.join(row))
            .filter(|booking| predicate(booking))
            .collect();
        selected.sort_by(Booking::newest_first);
        selected
    }

    fn references_user(&self, id: UserId) -> bool {
        self.items.values().any(|item| item.owner_id() == id)
            || self.bookings.values().any(|row| row.booker_id == id)
            || self.comments.iter().any(|row| row.author_id == id)
    }

    fn join_comment(&self, row: &CommentRow) -> Comment {
        let author_name = self
            .users
            .get(&row.author_id)
            .map(|user| user.name().to_owned())
            .unwrap_or_default();
        Comment {
            id: row.id,
            item_id: row.item_id,
            author_id: row.author_id,
            author_name,
            text: row.text.clone(),
            created: row.created,
        }
    }
}

/// Process-local store backing every repository port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        let id = next_id(&mut tables.last_user, UserId::new).map_err(UserPersistenceError::query)?;
        let stored = user.with_id(id);
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn exists(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.contains_key(&id))
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.values().cloned().collect())
    }

    async fn update(&self, user: User) -> Result<Option<User>, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        let Some(slot) = tables.users.get_mut(&user.id()) else {
            return Ok(None);
        };
        *slot = user.clone();
        Ok(Some(user))
    }

    async fn delete(&self, id: UserId) -> Result<UserRemoval, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if !tables.users.contains_key(&id) {
            return Ok(UserRemoval::Missing);
        }
        if tables.references_user(id) {
            return Ok(UserRemoval::Referenced);
        }
        tables.users.remove(&id);
        Ok(UserRemoval::Removed)
    }
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn insert(&self, item: NewItem) -> Result<Item, ItemPersistenceError> {
        let mut tables = self.lock().map_err(ItemPersistenceError::query)?;
        let id = next_id(&mut tables.last_item, ItemId::new).map_err(ItemPersistenceError::query)?;
        let stored = item.with_id(id);
        tables.items.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemPersistenceError> {
        let tables = self.lock().map_err(ItemPersistenceError::query)?;
        Ok(tables.items.get(&id).cloned())
    }

    async fn update(&self, item: Item) -> Result<Option<Item>, ItemPersistenceError> {
        let mut tables = self.lock().map_err(ItemPersistenceError::query)?;
        let Some(slot) = tables.items.get_mut(&item.id()) else {
            return Ok(None);
        };
        *slot = item.clone();
        Ok(Some(item))
    }

    async fn list_by_owner(
        &self,
        owner_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<Item>, ItemPersistenceError> {
        let tables = self.lock().map_err(ItemPersistenceError::query)?;
        let owned = tables
            .items
            .values()
            .filter(|item| item.owner_id() == owner_id)
            .cloned();
        Ok(page.window(owned).collect())
    }

    async fn search(
        &self,
        text: &str,
        page: PageRequest,
    ) -> Result<Vec<Item>, ItemPersistenceError> {
        let tables = self.lock().map_err(ItemPersistenceError::query)?;
        let matching = tables
            .items
            .values()
            .filter(|item| item.matches_search(text))
            .cloned();
        Ok(page.window(matching).collect())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, BookingRepositoryError> {
        let mut tables = self.lock().map_err(BookingRepositoryError::query)?;
        let id = next_id(&mut tables.last_booking, BookingId::new)
            .map_err(BookingRepositoryError::query)?;
        let row = BookingRow {
            id,
            item_id: booking.item_id,
            booker_id: booking.booker_id,
            start: booking.period.start(),
            end: booking.period.end(),
            status: booking.status(),
        };
        let joined = tables.join(&row).ok_or_else(|| {
            BookingRepositoryError::query(format!("item {} does not exist", booking.item_id))
        })?;
        tables.bookings.insert(id, row);
        Ok(joined)
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        let tables = self.lock().map_err(BookingRepositoryError::query)?;
        Ok(tables.bookings.get(&id).and_then(|row| tables.join(row)))
    }

    async fn transition_status(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<StatusTransition, BookingRepositoryError> {
        let mut tables = self.lock().map_err(BookingRepositoryError::query)?;
        let Some(row) = tables.bookings.get_mut(&id) else {
            return Ok(StatusTransition::Missing);
        };
        if row.status != from {
            return Ok(StatusTransition::Conflict {
                observed: row.status,
            });
        }
        row.status = to;
        let row = row.clone();
        Ok(tables
            .join(&row)
            .map_or(StatusTransition::Missing, StatusTransition::Applied))
    }

    async fn list_for_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let tables = self.lock().map_err(BookingRepositoryError::query)?;
        let selected =
            tables.select(|booking| booking.booker_id == booker_id && filter.matches(booking));
        Ok(page.window(selected).collect())
    }

    async fn list_for_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let tables = self.lock().map_err(BookingRepositoryError::query)?;
        let selected =
            tables.select(|booking| booking.item.owner_id == owner_id && filter.matches(booking));
        Ok(page.window(selected).collect())
    }

    async fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Booking>, BookingRepositoryError> {
        let tables = self.lock().map_err(BookingRepositoryError::query)?;
        Ok(tables.select(|booking| booking.item.id == item_id))
    }

    async fn has_finished_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<bool, BookingRepositoryError> {
        let tables = self.lock().map_err(BookingRepositoryError::query)?;
        Ok(tables.bookings.values().any(|row| {
            row.booker_id == booker_id && row.item_id == item_id && row.end < now
        }))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut tables = self.lock().map_err(CommentPersistenceError::query)?;
        let id = next_id(&mut tables.last_comment, CommentId::new)
            .map_err(CommentPersistenceError::query)?;
        let row = CommentRow {
            id,
            item_id: comment.item_id,
            author_id: comment.author_id,
            text: comment.text,
            created: comment.created,
        };
        let joined = tables.join_comment(&row);
        tables.comments.push(row);
        Ok(joined)
    }

    async fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Comment>, CommentPersistenceError> {
        let tables = self.lock().map_err(CommentPersistenceError::query)?;
        Ok(tables
            .comments
            .iter()
            .filter(|row| row.item_id == item_id)
            .map(|row| tables.join_comment(row))
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
