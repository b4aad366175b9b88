//! PostgreSQL-backed `BookingRepository`.
//!
//! Every read joins `items` so the domain booking carries the item name and
//! owner. State filters, ordering, and the page window are pushed into SQL.
//! Status transitions are a single conditional `UPDATE ... WHERE status = $from`,
//! which makes PostgreSQL's row lock the arbiter between racing approvals.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{BookingRepository, BookingRepositoryError, StatusTransition};
use crate::domain::{
    Booking, BookingFilter, BookingId, BookingState, BookingStatus, ItemId, NewBooking, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BookedItemRow, BookingRow, NewBookingRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, items};

/// Diesel adapter for bookings.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, Copy)]
enum Party {
    Booker(UserId),
    Owner(UserId),
}

fn map_pool_error(error: PoolError) -> BookingRepositoryError {
    map_basic_pool_error(error, BookingRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookingRepositoryError {
    map_basic_diesel_error(
        error,
        BookingRepositoryError::query,
        BookingRepositoryError::connection,
    )
}

fn to_domain((booking, item): (BookingRow, BookedItemRow)) -> Result<Booking, BookingRepositoryError> {
    booking
        .into_domain(item)
        .map_err(BookingRepositoryError::query)
}

async fn load_joined(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<Option<Booking>, BookingRepositoryError> {
    let row = bookings::table
        .inner_join(items::table)
        .filter(bookings::id.eq(id))
        .select((BookingRow::as_select(), BookedItemRow::as_select()))
        .first::<(BookingRow, BookedItemRow)>(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    row.map(to_domain).transpose()
}

impl DieselBookingRepository {
    async fn list(
        &self,
        party: Party,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = bookings::table
            .inner_join(items::table)
            .select((BookingRow::as_select(), BookedItemRow::as_select()))
            .into_boxed();

        query = match party {
            Party::Booker(id) => query.filter(bookings::booker_id.eq(id.get())),
            Party::Owner(id) => query.filter(items::owner_id.eq(id.get())),
        };

        let now = filter.now;
        query = match filter.state {
            BookingState::All => query,
            BookingState::Current => query
                .filter(bookings::start_at.le(now))
                .filter(bookings::end_at.gt(now)),
            BookingState::Past => query.filter(bookings::end_at.lt(now)),
            BookingState::Future => query.filter(bookings::start_at.gt(now)),
            BookingState::Waiting => {
                query.filter(bookings::status.eq(BookingStatus::Waiting.as_str()))
            }
            BookingState::Rejected => {
                query.filter(bookings::status.eq(BookingStatus::Rejected.as_str()))
            }
        };

        let rows = query
            .order((bookings::start_at.desc(), bookings::id.desc()))
            .offset(page.first_row())
            .limit(page.limit())
            .load::<(BookingRow, BookedItemRow)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(?party, state = filter.state.as_str(), rows = rows.len(), "bookings listed");
        rows.into_iter().map(to_domain).collect()
    }
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i64 = diesel::insert_into(bookings::table)
            .values(&NewBookingRow {
                item_id: booking.item_id.get(),
                booker_id: booking.booker_id.get(),
                start_at: booking.period.start(),
                end_at: booking.period.end(),
                status: booking.status().as_str(),
            })
            .returning(bookings::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        load_joined(&mut conn, id).await?.ok_or_else(|| {
            BookingRepositoryError::query(format!("booking {id} vanished after insert"))
        })
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_joined(&mut conn, id.get()).await
    }

    async fn transition_status(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<StatusTransition, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated: Option<i64> = diesel::update(
            bookings::table
                .filter(bookings::id.eq(id.get()))
                .filter(bookings::status.eq(from.as_str())),
        )
        .set(bookings::status.eq(to.as_str()))
        .returning(bookings::id)
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if updated.is_some() {
            return Ok(load_joined(&mut conn, id.get())
                .await?
                .map_or(StatusTransition::Missing, StatusTransition::Applied));
        }

        let observed: Option<String> = bookings::table
            .find(id.get())
            .select(bookings::status)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match observed {
            None => Ok(StatusTransition::Missing),
            Some(raw) => {
                let observed = raw
                    .parse::<BookingStatus>()
                    .map_err(|err| BookingRepositoryError::query(err.to_string()))?;
                Ok(StatusTransition::Conflict { observed })
            }
        }
    }

    async fn list_for_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        self.list(Party::Booker(booker_id), filter, page).await
    }

    async fn list_for_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        self.list(Party::Owner(owner_id), filter, page).await
    }

    async fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = bookings::table
            .inner_join(items::table)
            .filter(bookings::item_id.eq(item_id.get()))
            .select((BookingRow::as_select(), BookedItemRow::as_select()))
            .order((bookings::start_at.desc(), bookings::id.desc()))
            .load::<(BookingRow, BookedItemRow)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn has_finished_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<bool, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            bookings::table
                .filter(bookings::booker_id.eq(booker_id.get()))
                .filter(bookings::item_id.eq(item_id.get()))
                .filter(bookings::end_at.lt(now)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
