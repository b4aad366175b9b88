//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, so they stay testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    BookingCommand, BookingQuery, BookingRepository, CatalogueCommand, CatalogueQuery,
    CommentRepository, ItemRepository, UserRepository,
};
use crate::domain::{BookingQueryService, BookingService, CatalogueService};

/// Driving ports used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub catalogue: Arc<dyn CatalogueCommand>,
    pub catalogue_query: Arc<dyn CatalogueQuery>,
}

/// Driven adapters from which [`HttpState::from_repositories`] builds the
/// domain services.
pub struct Repositories<U, I, B, C> {
    pub users: Arc<U>,
    pub items: Arc<I>,
    pub bookings: Arc<B>,
    pub comments: Arc<C>,
}

impl HttpState {
    /// Wire the domain services over one set of repositories.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use shareit::inbound::http::state::{HttpState, Repositories};
    /// use shareit::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::from_repositories(
    ///     Repositories {
    ///         users: store.clone(),
    ///         items: store.clone(),
    ///         bookings: store.clone(),
    ///         comments: store,
    ///     },
    ///     Arc::new(DefaultClock),
    /// );
    /// let _bookings = state.bookings.clone();
    /// ```
    pub fn from_repositories<U, I, B, C>(
        repositories: Repositories<U, I, B, C>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        U: UserRepository + 'static,
        I: ItemRepository + 'static,
        B: BookingRepository + 'static,
        C: CommentRepository + 'static,
    {
        let Repositories {
            users,
            items,
            bookings,
            comments,
        } = repositories;

        let command = BookingService::new(
            users.clone(),
            items.clone(),
            bookings.clone(),
            clock.clone(),
        );
        let query = BookingQueryService::new(users.clone(), bookings.clone(), clock.clone());
        let catalogue = Arc::new(CatalogueService::new(users, items, bookings, comments, clock));

        Self {
            bookings: Arc::new(command),
            bookings_query: Arc::new(query),
            catalogue: catalogue.clone(),
            catalogue_query: catalogue,
        }
    }
}
