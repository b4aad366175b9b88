//! Booking API handlers.
//!
//! ```text
//! POST  /bookings                      {"itemId":1,"start":"…","end":"…"}
//! PATCH /bookings/{id}?approved=true
//! GET   /bookings/{id}
//! GET   /bookings?state=ALL&from=0&size=10
//! GET   /bookings/owner?state=ALL&from=0&size=10
//! ```
//!
//! Every route reads the acting user from `X-Sharer-User-Id`.

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CreateBookingRequest, GetBookingRequest, ListBookingsRequest, SetApprovalRequest,
};
use crate::domain::{
    Booking, BookingId, BookingState, BookingStatus, Error, ItemId, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::actor::Actor;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, page_request, parse_timestamp, require,
};

const ITEM_ID: FieldName = FieldName::new("itemId");
const START: FieldName = FieldName::new("start");
const END: FieldName = FieldName::new("end");
const APPROVED: FieldName = FieldName::new("approved");

/// Request body for `POST /bookings`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    #[schema(example = 1)]
    pub item_id: Option<i64>,
    /// RFC 3339, or `YYYY-MM-DDTHH:MM:SS` read as UTC.
    #[schema(example = "2026-03-02T10:00:00")]
    pub start: Option<String>,
    #[schema(example = "2026-03-03T10:00:00")]
    pub end: Option<String>,
}

impl CreateBookingBody {
    fn into_request(self, actor: UserId) -> Result<CreateBookingRequest, Error> {
        let raw_item = require(self.item_id, ITEM_ID)?;
        let item_id = ItemId::new(raw_item)
            .map_err(|_| Error::not_found(format!("item {raw_item} not found")))?;
        let start = parse_timestamp(&require(self.start, START)?, START)?;
        let end = parse_timestamp(&require(self.end, END)?, END)?;
        Ok(CreateBookingRequest {
            actor,
            item_id,
            start,
            end,
        })
    }
}

/// Booker reference inside a [`BookingView`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct BookerView {
    pub id: UserId,
}

/// Item reference inside a [`BookingView`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct BookedItemView {
    pub id: ItemId,
    pub name: String,
}

/// Booking as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct BookingView {
    pub id: BookingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub booker: BookerView,
    pub item: BookedItemView,
}

impl From<Booking> for BookingView {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            start: booking.start,
            end: booking.end,
            status: booking.status,
            booker: BookerView {
                id: booking.booker_id,
            },
            item: BookedItemView {
                id: booking.item.id,
                name: booking.item.name,
            },
        }
    }
}

/// Query for `PATCH /bookings/{id}`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ApprovalQuery {
    /// `true` approves, `false` rejects.
    #[param(value_type = bool)]
    pub approved: Option<String>,
}

impl ApprovalQuery {
    fn approve(self) -> Result<bool, Error> {
        let raw = require(self.approved, APPROVED)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::invalid_request("approved must be true or false").with_details(
                serde_json::json!({ "field": APPROVED.as_str(), "value": raw }),
            )),
        }
    }
}

/// Query shared by both list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED. Defaults to ALL.
    pub state: Option<String>,
    /// Zero-based row offset. Defaults to 0.
    pub from: Option<i64>,
    /// Page size. Defaults to 10.
    pub size: Option<i64>,
}

impl ListQuery {
    fn into_request(self, actor: UserId) -> Result<ListBookingsRequest, Error> {
        let page = page_request(self.from, self.size)?;
        Ok(ListBookingsRequest {
            actor,
            state: self
                .state
                .unwrap_or_else(|| BookingState::default().as_str().to_owned()),
            page,
        })
    }
}

fn booking_id(raw: i64) -> Result<BookingId, Error> {
    BookingId::new(raw).map_err(|_| Error::not_found(format!("booking {raw} not found")))
}

/// Request a booking of someone else's item.
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingBody,
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user")),
    responses(
        (status = 201, description = "Booking created in WAITING", body = BookingView),
        (status = 400, description = "Invalid request or item unavailable", body = Error),
        (status = 404, description = "Unknown user or item", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    actor: Actor,
    payload: web::Json<CreateBookingBody>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner().into_request(actor.id())?;
    let booking = state.bookings.create_booking(request).await?;
    Ok(HttpResponse::Created().json(BookingView::from(booking)))
}

/// Approve or reject a waiting booking. Owner only.
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    params(
        ("id" = i64, Path, description = "Booking id"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user"),
        ApprovalQuery
    ),
    responses(
        (status = 200, description = "Decision recorded", body = BookingView),
        (status = 400, description = "Booking already decided or bad flag", body = Error),
        (status = 404, description = "Unknown booking or caller is not the owner", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "setBookingApproval"
)]
#[patch("/bookings/{id}")]
pub async fn set_approval(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<i64>,
    query: web::Query<ApprovalQuery>,
) -> ApiResult<web::Json<BookingView>> {
    let approve = query.into_inner().approve()?;
    let booking = state
        .bookings
        .set_approval(SetApprovalRequest {
            actor: actor.id(),
            booking_id: booking_id(path.into_inner())?,
            approve,
        })
        .await?;
    Ok(web::Json(booking.into()))
}

/// Fetch one booking. Visible to its booker and the item owner.
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    params(
        ("id" = i64, Path, description = "Booking id"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Booking", body = BookingView),
        (status = 404, description = "Unknown or not visible", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<i64>,
) -> ApiResult<web::Json<BookingView>> {
    let booking = state
        .bookings_query
        .get_booking(GetBookingRequest {
            actor: actor.id(),
            booking_id: booking_id(path.into_inner())?,
        })
        .await?;
    Ok(web::Json(booking.into()))
}

/// Bookings made by the caller, newest first.
#[utoipa::path(
    get,
    path = "/bookings",
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user"), ListQuery),
    responses(
        (status = 200, description = "Bookings", body = [BookingView]),
        (status = 400, description = "Unknown state or bad page", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "listBookerBookings"
)]
#[get("/bookings")]
pub async fn list_for_booker(
    state: web::Data<HttpState>,
    actor: Actor,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<BookingView>>> {
    let request = query.into_inner().into_request(actor.id())?;
    let bookings = state.bookings_query.list_for_booker(request).await?;
    Ok(web::Json(bookings.into_iter().map(Into::into).collect()))
}

/// Bookings on items the caller owns, newest first.
#[utoipa::path(
    get,
    path = "/bookings/owner",
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user"), ListQuery),
    responses(
        (status = 200, description = "Bookings", body = [BookingView]),
        (status = 400, description = "Unknown state or bad page", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "listOwnerBookings"
)]
#[get("/bookings/owner")]
pub async fn list_for_owner(
    state: web::Data<HttpState>,
    actor: Actor,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<BookingView>>> {
    let request = query.into_inner().into_request(actor.id())?;
    let bookings = state.bookings_query.list_for_owner(request).await?;
    Ok(web::Json(bookings.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
