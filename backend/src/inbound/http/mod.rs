//! HTTP inbound adapter exposing the REST endpoints.

use actix_web::web;

use crate::domain::Error;

pub mod actor;
pub mod bookings;
pub mod error;
pub mod health;
pub mod items;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

fn malformed(kind: &str, err: impl std::fmt::Display) -> actix_web::Error {
    Error::invalid_request(format!("malformed {kind}: {err}")).into()
}

/// Register every API route plus extractor configs that render malformed
/// bodies, queries and paths as `invalid_request` errors.
///
/// `/items/search` and `/bookings/owner` are registered ahead of the
/// `{id}` routes they shadow so the literal segment wins.
///
/// ```
/// use actix_web::App;
/// use shareit::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| malformed("JSON body", err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| malformed("query", err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| malformed("path", err)))
        .service(users::register_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(items::create_item)
        .service(items::list_owner_items)
        .service(items::search_items)
        .service(items::get_item)
        .service(items::update_item)
        .service(items::add_comment)
        .service(bookings::create_booking)
        .service(bookings::list_for_owner)
        .service(bookings::list_for_booker)
        .service(bookings::get_booking)
        .service(bookings::set_approval);
}
