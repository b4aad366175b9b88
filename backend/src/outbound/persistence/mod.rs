//! PostgreSQL persistence adapters using Diesel.
//!
//! Each adapter implements one driven port over a shared [`DbPool`]. Row
//! structs (`models.rs`) and table definitions (`schema.rs`) stay private to
//! this module; only domain types cross the port boundary.
//!
//! ```ignore
//! use shareit::outbound::persistence::{DbPool, DieselBookingRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/shareit")).await?;
//! let bookings = DieselBookingRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_booking_repository;
mod diesel_comment_repository;
mod diesel_item_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_item_repository::DieselItemRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
