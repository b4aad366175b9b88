//! Diesel row structs. Internal to the persistence layer.
//!
//! Reads convert into domain types through `into_domain`, which re-runs the
//! domain constructors so a corrupt row surfaces as a query error instead of
//! an invalid aggregate.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{bookings, comments, items, users};
use crate::domain::{
    BookedItem, Booking, BookingId, BookingStatus, Comment, CommentId, Item, ItemId, NewItem,
    NewUser, User, UserId,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, String> {
        let id = UserId::new(self.id).map_err(|err| err.to_string())?;
        let user = NewUser::new(self.name, self.email).map_err(|err| err.to_string())?;
        Ok(user.with_id(id))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
}

impl ItemRow {
    pub(crate) fn into_domain(self) -> Result<Item, String> {
        let id = ItemId::new(self.id).map_err(|err| err.to_string())?;
        let owner_id = UserId::new(self.owner_id).map_err(|err| err.to_string())?;
        let item = NewItem::new(owner_id, self.name, self.description, self.available)
            .map_err(|err| err.to_string())?;
        Ok(item.with_id(id))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = items)]
pub(crate) struct NewItemRow<'a> {
    pub owner_id: i64,
    pub name: &'a str,
    pub description: &'a str,
    pub available: bool,
}

/// Item columns carried alongside every booking read.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookedItemRow {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: i64,
    pub booker_id: i64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: String,
}

impl BookingRow {
    pub(crate) fn into_domain(self, item: BookedItemRow) -> Result<Booking, String> {
        Ok(Booking {
            id: BookingId::new(self.id).map_err(|err| err.to_string())?,
            start: self.start_at,
            end: self.end_at,
            status: self
                .status
                .parse::<BookingStatus>()
                .map_err(|err| err.to_string())?,
            booker_id: UserId::new(self.booker_id).map_err(|err| err.to_string())?,
            item: BookedItem {
                id: ItemId::new(item.id).map_err(|err| err.to_string())?,
                name: item.name,
                owner_id: UserId::new(item.owner_id).map_err(|err| err.to_string())?,
            },
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub item_id: i64,
    pub booker_id: i64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub item_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentRow {
    pub(crate) fn into_domain(self, author_name: String) -> Result<Comment, String> {
        Ok(Comment {
            id: CommentId::new(self.id).map_err(|err| err.to_string())?,
            item_id: ItemId::new(self.item_id).map_err(|err| err.to_string())?,
            author_id: UserId::new(self.author_id).map_err(|err| err.to_string())?,
            author_name,
            text: self.text,
            created: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub item_id: i64,
    pub author_id: i64,
    pub text: &'a str,
    pub created_at: DateTime<Utc>,
}
