//! Builds the HTTP state for the configured store.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use shareit::inbound::http::state::{HttpState, Repositories};
use shareit::outbound::memory::InMemoryStore;
use shareit::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselCommentRepository, DieselItemRepository,
    DieselUserRepository,
};

use super::config::StoreBackend;

fn in_memory_state(clock: Arc<dyn Clock>) -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    HttpState::from_repositories(
        Repositories {
            users: store.clone(),
            items: store.clone(),
            bookings: store.clone(),
            comments: store,
        },
        clock,
    )
}

fn postgres_state(pool: &DbPool, clock: Arc<dyn Clock>) -> HttpState {
    HttpState::from_repositories(
        Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            items: Arc::new(DieselItemRepository::new(pool.clone())),
            bookings: Arc::new(DieselBookingRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
        },
        clock,
    )
}

/// Wire the domain services over the configured store.
pub(super) fn build_http_state(store: &StoreBackend) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match store {
        StoreBackend::InMemory => {
            info!(store = "memory", "booking store selected");
            in_memory_state(clock)
        }
        StoreBackend::Postgres(pool) => {
            info!(store = "postgres", "booking store selected");
            postgres_state(pool, clock)
        }
    };
    web::Data::new(state)
}
