//! OpenAPI document for the REST API.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{BookingStatus, Error, ErrorCode};
use crate::inbound::http::bookings::{
    BookedItemView, BookerView, BookingView, CreateBookingBody,
};
use crate::inbound::http::items::{
    BookingRefView, CommentBody, CommentView, CreateItemBody, ItemDetailsView, ItemView,
    UpdateItemBody,
};
use crate::inbound::http::users::{RegisterUserBody, UpdateUserBody, UserView};

/// Registers the acting-user header as an API key scheme.
struct ActorHeaderAddon;

impl Modify for ActorHeaderAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SharerUserId",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-Sharer-User-Id",
                "Numeric id of the acting user.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&ActorHeaderAddon),
    info(
        title = "ShareIt API",
        description = "Item sharing: users list items, others book them, owners approve."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SharerUserId" = [])),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::list_owner_items,
        crate::inbound::http::items::search_items,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::update_item,
        crate::inbound::http::items::add_comment,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::set_approval,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::list_for_booker,
        crate::inbound::http::bookings::list_for_owner,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        BookingStatus,
        RegisterUserBody,
        UpdateUserBody,
        UserView,
        CreateItemBody,
        UpdateItemBody,
        ItemView,
        ItemDetailsView,
        BookingRefView,
        CommentBody,
        CommentView,
        CreateBookingBody,
        BookingView,
        BookerView,
        BookedItemView,
    )),
    tags(
        (name = "users", description = "User directory"),
        (name = "items", description = "Item catalogue and comments"),
        (name = "bookings", description = "Booking lifecycle and queries"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
