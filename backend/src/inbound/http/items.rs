//! Item catalogue handlers.
//!
//! ```text
//! POST  /items                      {"name":"Drill","description":"…","available":true}
//! PATCH /items/{id}                 {"available":false}
//! GET   /items?from=0&size=10
//! GET   /items/search?text=drill&from=0&size=10
//! GET   /items/{id}
//! POST  /items/{id}/comment         {"text":"Worked well"}
//! ```
//!
//! Search is anonymous; every other route reads `X-Sharer-User-Id`.

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    AddCommentRequest, BookingRef, CreateItemRequest, ItemDetails, ItemDetailsRequest,
    OwnerItemsRequest, SearchItemsRequest, UpdateItemRequest,
};
use crate::domain::{BookingId, Comment, CommentId, Error, Item, ItemId, ItemPatch, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::actor::Actor;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, page_request, require};

/// Request body for `POST /items`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateItemBody {
    #[schema(example = "Drill")]
    pub name: Option<String>,
    #[schema(example = "Cordless, two batteries")]
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Request body for `PATCH /items/{id}`. Absent or blank fields are kept.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateItemBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl From<UpdateItemBody> for ItemPatch {
    fn from(body: UpdateItemBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            available: body.available,
        }
    }
}

/// Query for `GET /items`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct OwnerItemsQuery {
    /// Zero-based row offset. Defaults to 0.
    pub from: Option<i64>,
    /// Page size. Defaults to 10.
    pub size: Option<i64>,
}

/// Query for `GET /items/search`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Matched against name and description, ignoring case.
    pub text: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Request body for `POST /items/{id}/comment`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommentBody {
    #[schema(example = "Worked well")]
    pub text: Option<String>,
}

/// Item fields as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: UserId,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        Self {
            id: item.id(),
            owner_id: item.owner_id(),
            name: item.name().to_owned(),
            description: item.description().to_owned(),
            available: item.available(),
        }
    }
}

/// Booking summary entry on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRefView {
    pub id: BookingId,
    pub booker_id: UserId,
}

impl From<BookingRef> for BookingRefView {
    fn from(value: BookingRef) -> Self {
        Self {
            id: value.id,
            booker_id: value.booker_id,
        }
    }
}

/// Comment as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: CommentId,
    pub text: String,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            author_name: comment.author_name,
            created: comment.created,
        }
    }
}

/// Item detail view: the item plus booking summary and comments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailsView {
    #[serde(flatten)]
    pub item: ItemView,
    pub last_booking: Option<BookingRefView>,
    pub next_booking: Option<BookingRefView>,
    pub comments: Vec<CommentView>,
}

impl From<ItemDetails> for ItemDetailsView {
    fn from(details: ItemDetails) -> Self {
        Self {
            item: details.item.into(),
            last_booking: details.last_booking.map(Into::into),
            next_booking: details.next_booking.map(Into::into),
            comments: details.comments.into_iter().map(Into::into).collect(),
        }
    }
}

fn item_id(raw: i64) -> Result<ItemId, Error> {
    ItemId::new(raw).map_err(|_| Error::not_found(format!("item {raw} not found")))
}

/// List an item owned by the caller.
#[utoipa::path(
    post,
    path = "/items",
    request_body = CreateItemBody,
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user")),
    responses(
        (status = 201, description = "Item created", body = ItemView),
        (status = 400, description = "Missing or blank fields", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["items"],
    operation_id = "createItem"
)]
#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    actor: Actor,
    payload: web::Json<CreateItemBody>,
) -> ApiResult<HttpResponse> {
    let CreateItemBody {
        name,
        description,
        available,
    } = payload.into_inner();
    let item = state
        .catalogue
        .create_item(CreateItemRequest {
            actor: actor.id(),
            name: require(name, FieldName::new("name"))?,
            description: require(description, FieldName::new("description"))?,
            available: require(available, FieldName::new("available"))?,
        })
        .await?;
    Ok(HttpResponse::Created().json(ItemView::from(item)))
}

/// Edit an item. Owner only.
#[utoipa::path(
    patch,
    path = "/items/{id}",
    request_body = UpdateItemBody,
    params(
        ("id" = i64, Path, description = "Item id"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Item updated", body = ItemView),
        (status = 404, description = "Unknown user or item, or caller is not the owner", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["items"],
    operation_id = "updateItem"
)]
#[patch("/items/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<i64>,
    payload: web::Json<UpdateItemBody>,
) -> ApiResult<web::Json<ItemView>> {
    let item = state
        .catalogue
        .update_item(UpdateItemRequest {
            actor: actor.id(),
            item_id: item_id(path.into_inner())?,
            patch: payload.into_inner().into(),
        })
        .await?;
    Ok(web::Json(item.into()))
}

/// The caller's items with their booking summaries, ordered by id.
#[utoipa::path(
    get,
    path = "/items",
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user"), OwnerItemsQuery),
    responses(
        (status = 200, description = "Owned items", body = [ItemDetailsView]),
        (status = 400, description = "Bad page", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["items"],
    operation_id = "listOwnerItems"
)]
#[get("/items")]
pub async fn list_owner_items(
    state: web::Data<HttpState>,
    actor: Actor,
    query: web::Query<OwnerItemsQuery>,
) -> ApiResult<web::Json<Vec<ItemDetailsView>>> {
    let OwnerItemsQuery { from, size } = query.into_inner();
    let details = state
        .catalogue_query
        .owner_items(OwnerItemsRequest {
            actor: actor.id(),
            page: page_request(from, size)?,
        })
        .await?;
    Ok(web::Json(details.into_iter().map(Into::into).collect()))
}

/// Available items matching free text. Blank text matches nothing.
#[utoipa::path(
    get,
    path = "/items/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching items", body = [ItemView]),
        (status = 400, description = "Bad page", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    security([]),
    tags = ["items"],
    operation_id = "searchItems"
)]
#[get("/items/search")]
pub async fn search_items(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<ItemView>>> {
    let SearchQuery { text, from, size } = query.into_inner();
    let items = state
        .catalogue_query
        .search_items(SearchItemsRequest {
            text: text.unwrap_or_default(),
            page: page_request(from, size)?,
        })
        .await?;
    Ok(web::Json(items.into_iter().map(Into::into).collect()))
}

/// Item details. Owners also see the last and next booking.
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(
        ("id" = i64, Path, description = "Item id"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDetailsView),
        (status = 404, description = "Unknown user or item", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["items"],
    operation_id = "getItem"
)]
#[get("/items/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ItemDetailsView>> {
    let details = state
        .catalogue_query
        .item_details(ItemDetailsRequest {
            actor: actor.id(),
            item_id: item_id(path.into_inner())?,
        })
        .await?;
    Ok(web::Json(details.into()))
}

/// Review an item after a finished booking.
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    request_body = CommentBody,
    params(
        ("id" = i64, Path, description = "Item id"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Comment stored", body = CommentView),
        (status = 400, description = "Blank text or no finished booking", body = Error),
        (status = 404, description = "Unknown user or item", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["items"],
    operation_id = "addComment"
)]
#[post("/items/{id}/comment")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    actor: Actor,
    path: web::Path<i64>,
    payload: web::Json<CommentBody>,
) -> ApiResult<web::Json<CommentView>> {
    let comment = state
        .catalogue
        .add_comment(AddCommentRequest {
            actor: actor.id(),
            item_id: item_id(path.into_inner())?,
            text: require(payload.into_inner().text, FieldName::new("text"))?,
        })
        .await?;
    Ok(web::Json(comment.into()))
}

#[cfg(test)]
#[path = "items_tests.rs"]
mod tests;
