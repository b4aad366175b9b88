//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: process-local store used by default and in tests.
//! - **persistence**: PostgreSQL repositories using Diesel.
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules.

pub mod memory;
pub mod persistence;
