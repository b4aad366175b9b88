//! User directory handlers.
//!
//! ```text
//! POST   /users       {"name":"Ada","email":"ada@example.com"}
//! GET    /users
//! GET    /users/{id}
//! PATCH  /users/{id}  {"email":"countess@example.com"}
//! DELETE /users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{RegisterUserRequest, UpdateUserRequest};
use crate::domain::{Error, User, UserId, UserPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterUserBody {
    #[schema(example = "Ada")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
}

/// Request body for `PATCH /users/{id}`. Absent or blank fields are kept.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserBody {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_owned(),
            email: user.email().to_owned(),
        }
    }
}

fn user_id(raw: i64) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| Error::not_found(format!("user {raw} not found")))
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterUserBody,
    responses(
        (status = 201, description = "User registered", body = UserView),
        (status = 400, description = "Blank name or malformed email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    security([]),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserBody>,
) -> ApiResult<HttpResponse> {
    let RegisterUserBody { name, email } = payload.into_inner();
    let user = state
        .catalogue
        .register_user(RegisterUserRequest {
            name: require(name, FieldName::new("name"))?,
            email: require(email, FieldName::new("email"))?,
        })
        .await?;
    Ok(HttpResponse::Created().json(UserView::from(user)))
}

/// Every user, ordered by id.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [UserView]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    security([]),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserView>>> {
    let users = state.catalogue_query.list_users().await?;
    Ok(web::Json(users.into_iter().map(Into::into).collect()))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserView),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    security([]),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserView>> {
    let user = state
        .catalogue_query
        .get_user(user_id(path.into_inner())?)
        .await?;
    Ok(web::Json(user.into()))
}

/// Edit a user's name or email.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    request_body = UpdateUserBody,
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User updated", body = UserView),
        (status = 400, description = "Malformed email", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    security([]),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<UserView>> {
    let UpdateUserBody { name, email } = payload.into_inner();
    let user = state
        .catalogue
        .update_user(UpdateUserRequest {
            user_id: user_id(path.into_inner())?,
            patch: UserPatch { name, email },
        })
        .await?;
    Ok(web::Json(user.into()))
}

/// Remove a user that owns nothing and has no bookings or comments.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User removed"),
        (status = 400, description = "User still referenced", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    security([]),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .catalogue
        .delete_user(user_id(path.into_inner())?)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{call_json, harness, test_app};

    #[rstest]
    #[actix_web::test]
    async fn registers_and_assigns_sequential_ids() {
        let app = test::init_service(test_app(harness().state)).await;

        let mut ids = Vec::new();
        for name in ["Olga", "Boris"] {
            let req = test::TestRequest::post()
                .uri("/users")
                .set_json(json!({ "name": name, "email": format!("{name}@example.com") }))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::CREATED);
            let view: UserView = test::read_body_json(res).await;
            ids.push(view.id.get());
        }

        assert_eq!(ids, vec![1, 2]);
    }

    #[rstest]
    #[case(json!({ "name": "Ada" }))]
    #[case(json!({ "name": " ", "email": "ada@example.com" }))]
    #[case(json!({ "name": "Ada", "email": "ada.example.com" }))]
    #[actix_web::test]
    async fn rejects_incomplete_registrations(#[case] body: serde_json::Value) {
        let app = test::init_service(test_app(harness().state)).await;
        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(body)
            .to_request();

        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let error: Error = test::read_body_json(res).await;
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[actix_web::test]
    async fn lists_and_fetches_registered_users() {
        let h = harness();
        let olga = h.user("Olga").await;
        h.user("Boris").await;
        let app = test::init_service(test_app(h.state.clone())).await;

        let (status, listed) =
            call_json(&app, test::TestRequest::get().uri("/users").to_request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().map(Vec::len), Some(2));

        let uri = format!("/users/{}", olga.id());
        let (status, fetched) =
            call_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["email"], "olga@example.com");
    }

    #[rstest]
    #[case("/users/0")]
    #[case("/users/77")]
    #[actix_web::test]
    async fn unknown_users_are_not_found(#[case] uri: &str) {
        let app = test::init_service(test_app(harness().state)).await;

        let (status, body) =
            call_json(&app, test::TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }

    #[rstest]
    #[actix_web::test]
    async fn patch_changes_only_supplied_fields() {
        let h = harness();
        let olga = h.user("Olga").await;
        let app = test::init_service(test_app(h.state.clone())).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/users/{}", olga.id()))
            .set_json(json!({ "name": "", "email": "olga@shareit.test" }))
            .to_request();
        let (status, body) = call_json(&app, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Olga");
        assert_eq!(body["email"], "olga@shareit.test");
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_keeps_item_owners() {
        let h = harness();
        let olga = h.user("Olga").await;
        let boris = h.user("Boris").await;
        h.item(olga.id(), "Drill", true).await;
        let app = test::init_service(test_app(h.state.clone())).await;

        let remove = |id: UserId| {
            test::TestRequest::delete()
                .uri(&format!("/users/{id}"))
                .to_request()
        };
        let (owner_status, owner_body) = call_json(&app, remove(olga.id())).await;
        let (free_status, _) = call_json(&app, remove(boris.id())).await;
        let (again_status, _) = call_json(&app, remove(boris.id())).await;

        assert_eq!(owner_status, StatusCode::BAD_REQUEST);
        assert_eq!(owner_body["code"], "state_conflict");
        assert_eq!(free_status, StatusCode::NO_CONTENT);
        assert_eq!(again_status, StatusCode::NOT_FOUND);
    }
}
