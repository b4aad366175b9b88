//! User directory and item catalogue service.
//!
//! Plain field operations around the booking core: the user directory,
//! listing and editing items, composed item detail views, free-text search,
//! and post-use comments.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::access::is_owner;
use crate::domain::item_booking_summary::ItemBookingSummarizer;
use crate::domain::ports::{
    AddCommentRequest, BookingRef, BookingRepository, CatalogueCommand, CatalogueQuery,
    CommentRepository, CreateItemRequest, ItemDetails, ItemDetailsRequest, ItemRepository,
    OwnerItemsRequest, RegisterUserRequest, SearchItemsRequest, UpdateItemRequest,
    UpdateUserRequest, UserRemoval, UserRepository,
};
use crate::domain::service_errors::{
    map_booking_error, map_comment_error, map_item_error, map_user_error,
};
use crate::domain::{
    Booking, Comment, Error, Item, ItemId, NewComment, NewItem, NewUser, User, UserId,
};

fn booking_ref(booking: Booking) -> BookingRef {
    BookingRef {
        id: booking.id,
        booker_id: booking.booker_id,
    }
}

/// Catalogue service implementing the catalogue driving ports.
#[derive(Clone)]
pub struct CatalogueService<U, I, B, C> {
    users: Arc<U>,
    items: Arc<I>,
    bookings: Arc<B>,
    comments: Arc<C>,
    summarizer: ItemBookingSummarizer<B>,
    clock: Arc<dyn Clock>,
}

impl<U, I, B, C> CatalogueService<U, I, B, C>
where
    B: BookingRepository,
{
    /// Create a service over every store the catalogue touches.
    pub fn new(
        users: Arc<U>,
        items: Arc<I>,
        bookings: Arc<B>,
        comments: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let summarizer = ItemBookingSummarizer::new(Arc::clone(&bookings), Arc::clone(&clock));
        Self {
            users,
            items,
            bookings,
            comments,
            summarizer,
            clock,
        }
    }
}

impl<U, I, B, C> CatalogueService<U, I, B, C>
where
    U: UserRepository,
    I: ItemRepository,
{
    async fn find_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn find_item(&self, id: ItemId) -> Result<Item, Error> {
        self.items
            .find_by_id(id)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| Error::not_found(format!("item {id} not found")))
    }
}

impl<U, I, B, C> CatalogueService<U, I, B, C>
where
    U: UserRepository,
    I: ItemRepository,
    B: BookingRepository,
    C: CommentRepository,
{
    async fn details(&self, item: Item, viewer: UserId) -> Result<ItemDetails, Error> {
        let summary = self.summarizer.summarize_for_owner(&item, viewer).await?;
        let comments = self
            .comments
            .list_for_item(item.id())
            .await
            .map_err(map_comment_error)?;

        Ok(ItemDetails {
            item,
            last_booking: summary.last.map(booking_ref),
            next_booking: summary.next.map(booking_ref),
            comments,
        })
    }
}

#[async_trait]
impl<U, I, B, C> CatalogueCommand for CatalogueService<U, I, B, C>
where
    U: UserRepository,
    I: ItemRepository,
    B: BookingRepository,
    C: CommentRepository,
{
    async fn register_user(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let new_user = NewUser::new(request.name, request.email)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let user = self.users.insert(new_user).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn update_user(&self, request: UpdateUserRequest) -> Result<User, Error> {
        let UpdateUserRequest { user_id, patch } = request;
        let current = self.find_user(user_id).await?;
        let edited = current
            .patched(patch)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let user = self
            .users
            .update(edited)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
        info!(user_id = %user_id, "user updated");
        Ok(user)
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), Error> {
        match self.users.delete(user_id).await.map_err(map_user_error)? {
            UserRemoval::Removed => {
                info!(user_id = %user_id, "user deleted");
                Ok(())
            }
            UserRemoval::Missing => Err(Error::not_found(format!("user {user_id} not found"))),
            UserRemoval::Referenced => {
                debug!(user_id = %user_id, "delete refused for referenced user");
                Err(Error::state_conflict(format!(
                    "user {user_id} is still referenced by items, bookings or comments"
                ))
                .with_details(json!({ "userId": user_id })))
            }
        }
    }

    async fn create_item(&self, request: CreateItemRequest) -> Result<Item, Error> {
        let CreateItemRequest {
            actor,
            name,
            description,
            available,
        } = request;
        let owner = self.find_user(actor).await?;
        let new_item = NewItem::new(owner.id(), name, description, available)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let item = self.items.insert(new_item).await.map_err(map_item_error)?;
        info!(item_id = %item.id(), owner_id = %actor, "item listed");
        Ok(item)
    }

    async fn update_item(&self, request: UpdateItemRequest) -> Result<Item, Error> {
        let UpdateItemRequest {
            actor,
            item_id,
            patch,
        } = request;
        self.find_user(actor).await?;
        let current = self.find_item(item_id).await?;
        if !is_owner(actor, &current) {
            debug!(user_id = %actor, item_id = %item_id, "non-owner tried to edit item");
            return Err(Error::access_denied(format!(
                "user {actor} does not own item {item_id}"
            )));
        }

        let item = self
            .items
            .update(current.patched(patch))
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| Error::not_found(format!("item {item_id} not found")))?;
        info!(item_id = %item_id, owner_id = %actor, "item updated");
        Ok(item)
    }

    async fn add_comment(&self, request: AddCommentRequest) -> Result<Comment, Error> {
        let AddCommentRequest {
            actor,
            item_id,
            text,
        } = request;
        let author = self.find_user(actor).await?;
        let item = self.find_item(item_id).await?;
        let now = self.clock.utc();

        let finished = self
            .bookings
            .has_finished_booking(author.id(), item.id(), now)
            .await
            .map_err(map_booking_error)?;
        if !finished {
            debug!(user_id = %actor, item_id = %item_id, "comment without finished booking");
            return Err(Error::invalid_request(format!(
                "user {actor} has no finished booking of item {item_id}"
            ))
            .with_details(json!({ "userId": actor, "itemId": item_id })));
        }

        let new_comment = NewComment::new(item.id(), author.id(), text, now)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let comment = self
            .comments
            .insert(new_comment)
            .await
            .map_err(map_comment_error)?;
        info!(comment_id = %comment.id, item_id = %item_id, author_id = %actor, "comment added");
        Ok(comment)
    }
}

#[async_trait]
impl<U, I, B, C> CatalogueQuery for CatalogueService<U, I, B, C>
where
    U: UserRepository,
    I: ItemRepository,
    B: BookingRepository,
    C: CommentRepository,
{
    async fn item_details(&self, request: ItemDetailsRequest) -> Result<ItemDetails, Error> {
        let ItemDetailsRequest { actor, item_id } = request;
        let viewer = self.find_user(actor).await?;
        let item = self.find_item(item_id).await?;
        self.details(item, viewer.id()).await
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, Error> {
        self.find_user(user_id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_user_error)
    }

    async fn owner_items(&self, request: OwnerItemsRequest) -> Result<Vec<ItemDetails>, Error> {
        let OwnerItemsRequest { actor, page } = request;
        let owner = self.find_user(actor).await?;
        let items = self
            .items
            .list_by_owner(owner.id(), page)
            .await
            .map_err(map_item_error)?;

        let mut details = Vec::with_capacity(items.len());
        for item in items {
            details.push(self.details(item, owner.id()).await?);
        }
        Ok(details)
    }

    async fn search_items(&self, request: SearchItemsRequest) -> Result<Vec<Item>, Error> {
        let SearchItemsRequest { text, page } = request;
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        self.items
            .search(text, page)
            .await
            .map_err(map_item_error)
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
