//! Driving ports for the user directory and item catalogue.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{BookingId, Comment, Error, Item, ItemId, ItemPatch, User, UserId, UserPatch};

/// Request to register a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
}

/// Request to list an item owned by the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateItemRequest {
    pub actor: UserId,
    pub name: String,
    pub description: String,
    pub available: bool,
}

/// Request to edit a user's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub user_id: UserId,
    pub patch: UserPatch,
}

/// Request to edit an item owned by the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItemRequest {
    pub actor: UserId,
    pub item_id: ItemId,
    pub patch: ItemPatch,
}

/// Request for one page of the actor's own items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerItemsRequest {
    pub actor: UserId,
    pub page: PageRequest,
}

/// Free-text search over available items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchItemsRequest {
    pub text: String,
    pub page: PageRequest,
}

/// Request for an item's detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemDetailsRequest {
    pub actor: UserId,
    pub item_id: ItemId,
}

/// Request to review an item after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCommentRequest {
    pub actor: UserId,
    pub item_id: ItemId,
    pub text: String,
}

/// Booking reference shown on an item's detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRef {
    pub id: BookingId,
    pub booker_id: UserId,
}

/// Item composed with its booking summary and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    pub item: Item,
    pub last_booking: Option<BookingRef>,
    pub next_booking: Option<BookingRef>,
    pub comments: Vec<Comment>,
}

/// Driving port for catalogue writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    /// Register a user.
    async fn register_user(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Edit a user's name or email.
    async fn update_user(&self, request: UpdateUserRequest) -> Result<User, Error>;

    /// Remove a user nothing else references.
    async fn delete_user(&self, user_id: UserId) -> Result<(), Error>;

    /// List a new item owned by the actor.
    async fn create_item(&self, request: CreateItemRequest) -> Result<Item, Error>;

    /// Edit an item. Only its owner may.
    async fn update_item(&self, request: UpdateItemRequest) -> Result<Item, Error>;

    /// Comment on an item the actor has finished borrowing.
    async fn add_comment(&self, request: AddCommentRequest) -> Result<Comment, Error>;
}

/// Driving port for catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Item detail view for the actor.
    async fn item_details(&self, request: ItemDetailsRequest) -> Result<ItemDetails, Error>;

    /// Look up one user.
    async fn get_user(&self, user_id: UserId) -> Result<User, Error>;

    /// Every user, ordered by identifier.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// The actor's items, each with the owner's detail view.
    async fn owner_items(&self, request: OwnerItemsRequest) -> Result<Vec<ItemDetails>, Error>;

    /// Available items matching free text.
    async fn search_items(&self, request: SearchItemsRequest) -> Result<Vec<Item>, Error>;
}
