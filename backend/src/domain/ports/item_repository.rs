//! Port for the item catalogue lookups the booking core depends on.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Item, ItemId, NewItem, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by item repository adapters.
    pub enum ItemPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "item repository query failed: {message}",
    }
}

/// Read and list catalogue items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Store a new item and return it with its assigned identifier.
    async fn insert(&self, item: NewItem) -> Result<Item, ItemPersistenceError>;

    /// Fetch an item, including its owner and availability flag.
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemPersistenceError>;

    /// Overwrite an item's editable fields. `None` when the id is unknown.
    async fn update(&self, item: Item) -> Result<Option<Item>, ItemPersistenceError>;

    /// One page of an owner's items, ordered by identifier.
    async fn list_by_owner(
        &self,
        owner_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<Item>, ItemPersistenceError>;

    /// One page of available items whose name or description contains
    /// `text` case-insensitively, ordered by identifier.
    async fn search(
        &self,
        text: &str,
        page: PageRequest,
    ) -> Result<Vec<Item>, ItemPersistenceError>;
}

/// Fixture catalogue with no items.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureItemRepository;

#[async_trait]
impl ItemRepository for FixtureItemRepository {
    async fn insert(&self, _item: NewItem) -> Result<Item, ItemPersistenceError> {
        Err(ItemPersistenceError::query("fixture catalogue is read-only"))
    }

    async fn find_by_id(&self, _id: ItemId) -> Result<Option<Item>, ItemPersistenceError> {
        Ok(None)
    }

    async fn update(&self, _item: Item) -> Result<Option<Item>, ItemPersistenceError> {
        Ok(None)
    }

    async fn list_by_owner(
        &self,
        _owner_id: UserId,
        _page: PageRequest,
    ) -> Result<Vec<Item>, ItemPersistenceError> {
        Ok(Vec::new())
    }

    async fn search(
        &self,
        _text: &str,
        _page: PageRequest,
    ) -> Result<Vec<Item>, ItemPersistenceError> {
        Ok(Vec::new())
    }
}
