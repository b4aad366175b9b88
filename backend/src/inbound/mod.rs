//! Inbound adapters that translate HTTP requests into domain service calls.

pub mod http;
