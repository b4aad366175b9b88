//! PostgreSQL-backed `ItemRepository`.
//!
//! Owner listings and search are ordered by id and windowed in SQL. Search
//! is an `ILIKE` over name and description with LIKE wildcards in the
//! caller's text escaped.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{ItemPersistenceError, ItemRepository};
use crate::domain::{Item, ItemId, NewItem, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ItemRow, NewItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::items;

/// Diesel adapter for the item catalogue.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ItemPersistenceError {
    map_basic_pool_error(error, ItemPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ItemPersistenceError {
    map_basic_diesel_error(
        error,
        ItemPersistenceError::query,
        ItemPersistenceError::connection,
    )
}

fn to_domain(rows: Vec<ItemRow>) -> Result<Vec<Item>, ItemPersistenceError> {
    rows.into_iter()
        .map(ItemRow::into_domain)
        .collect::<Result<Vec<_>, String>>()
        .map_err(ItemPersistenceError::query)
}

/// `%text%` with `\`, `%` and `_` escaped for PostgreSQL's default LIKE escape.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn insert(&self, item: NewItem) -> Result<Item, ItemPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(items::table)
            .values(&NewItemRow {
                owner_id: item.owner_id().get(),
                name: item.name(),
                description: item.description(),
                available: item.available(),
            })
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row.into_domain().map_err(ItemPersistenceError::query)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = items::table
            .find(id.get())
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(ItemRow::into_domain)
            .transpose()
            .map_err(ItemPersistenceError::query)
    }

    async fn update(&self, item: Item) -> Result<Option<Item>, ItemPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(items::table.find(item.id().get()))
            .set((
                items::name.eq(item.name()),
                items::description.eq(item.description()),
                items::available.eq(item.available()),
            ))
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(ItemRow::into_domain)
            .transpose()
            .map_err(ItemPersistenceError::query)
    }

    async fn list_by_owner(
        &self,
        owner_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<Item>, ItemPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = items::table
            .filter(items::owner_id.eq(owner_id.get()))
            .order(items::id.asc())
            .offset(page.first_row())
            .limit(page.limit())
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(owner_id = %owner_id, rows = rows.len(), "owner items listed");
        to_domain(rows)
    }

    async fn search(
        &self,
        text: &str,
        page: PageRequest,
    ) -> Result<Vec<Item>, ItemPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = contains_pattern(text);
        let rows = items::table
            .filter(items::available.eq(true))
            .filter(
                items::name
                    .ilike(pattern.clone())
                    .or(items::description.ilike(pattern)),
            )
            .order(items::id.asc())
            .offset(page.first_row())
            .limit(page.limit())
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(rows = rows.len(), "item search ran");
        to_domain(rows)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("drill", "%drill%")]
    #[case("100%", "%100\\%%")]
    #[case("snake_case", "%snake\\_case%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn search_text_is_escaped(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(text), expected);
    }
}
