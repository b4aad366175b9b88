//! Shared helpers for the backend integration suites.
//!
//! Each file under `tests/` compiles as its own crate, so suites that need an
//! embedded PostgreSQL cluster pull these modules in with `mod support;`.

pub mod atexit_cleanup;
pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::provision_template_database;
