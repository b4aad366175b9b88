//! Tests for the booking handlers.

use actix_http::Request;
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Duration;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{ItemId, UserId};
use crate::inbound::http::test_utils::{ACTOR_HEADER, Harness, call_json, harness, test_app};

const START: &str = "2026-03-02T12:00:00";
const END: &str = "2026-03-03T12:00:00";

struct Seeded {
    harness: Harness,
    owner: UserId,
    booker: UserId,
    item: ItemId,
}

async fn seeded(available: bool) -> Seeded {
    let harness = harness();
    let owner = harness.user("Olga").await.id();
    let booker = harness.user("Boris").await.id();
    let item = harness.item(owner, "Drill", available).await.id();
    Seeded {
        harness,
        owner,
        booker,
        item,
    }
}

fn create(actor: UserId, body: Value) -> Request {
    test::TestRequest::post()
        .uri("/bookings")
        .insert_header((ACTOR_HEADER, actor.to_string()))
        .set_json(body)
        .to_request()
}

fn booking_body(item: ItemId) -> Value {
    json!({ "itemId": item.get(), "start": START, "end": END })
}

fn approve(actor: UserId, id: i64, approved: &str) -> Request {
    test::TestRequest::patch()
        .uri(&format!("/bookings/{id}?approved={approved}"))
        .insert_header((ACTOR_HEADER, actor.to_string()))
        .to_request()
}

fn get(actor: UserId, uri: &str) -> Request {
    test::TestRequest::get()
        .uri(uri)
        .insert_header((ACTOR_HEADER, actor.to_string()))
        .to_request()
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .expect("array body")
        .iter()
        .filter_map(|b| b["id"].as_i64())
        .collect()
}

#[rstest]
#[actix_web::test]
async fn create_returns_a_waiting_booking_view() {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;

    let (status, body) = call_json(&app, create(s.booker, booking_body(s.item))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["status"], "WAITING");
    assert_eq!(body["start"], "2026-03-02T12:00:00Z");
    assert_eq!(body["booker"], json!({ "id": s.booker.get() }));
    assert_eq!(body["item"], json!({ "id": s.item.get(), "name": "Drill" }));
}

#[rstest]
#[actix_web::test]
async fn owner_booking_own_item_looks_like_not_found() {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;

    let (status, body) = call_json(&app, create(s.owner, booking_body(s.item))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn unavailable_item_is_rejected() {
    let s = seeded(false).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;

    let (status, body) = call_json(&app, create(s.booker, booking_body(s.item))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[case(0)]
#[case(-4)]
#[actix_web::test]
async fn non_positive_item_id_is_not_found(#[case] raw: i64) {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;

    let body = json!({ "itemId": raw, "start": START, "end": END });
    let (status, error) = call_json(&app, create(s.booker, body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "not_found");
    assert_eq!(error["message"], format!("item {raw} not found"));
}

#[rstest]
#[case(json!({ "start": START, "end": END }), "itemId")]
#[case(json!({ "itemId": 1, "end": END }), "start")]
#[case(json!({ "itemId": 1, "start": "next week", "end": END }), "start")]
#[case(json!({ "itemId": 1, "start": END, "end": START }), "start")]
#[case(json!({ "itemId": 1, "start": "2026-02-28T12:00:00Z", "end": END }), "start")]
#[actix_web::test]
async fn malformed_periods_name_the_field(#[case] body: Value, #[case] field: &str) {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;

    let (status, error) = call_json(&app, create(s.booker, body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn missing_actor_header_is_a_bad_request() {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;
    let req = test::TestRequest::post()
        .uri("/bookings")
        .set_json(booking_body(s.item))
        .to_request();

    let (status, body) = call_json(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], ACTOR_HEADER);
}

#[rstest]
#[actix_web::test]
async fn approval_is_single_shot() {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;
    call_json(&app, create(s.booker, booking_body(s.item))).await;

    let (first, approved) = call_json(&app, approve(s.owner, 1, "true")).await;
    let (second, conflict) = call_json(&app, approve(s.owner, 1, "false")).await;
    let (_, current) = call_json(&app, get(s.booker, "/bookings/1")).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(approved["status"], "APPROVED");
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(conflict["code"], "state_conflict");
    let message = conflict["message"].as_str().expect("message");
    assert!(message.contains('1') && message.contains("APPROVED"));
    assert_eq!(current["status"], "APPROVED");
}

#[rstest]
#[actix_web::test]
async fn booker_cannot_approve() {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;
    call_json(&app, create(s.booker, booking_body(s.item))).await;

    let (status, body) = call_json(&app, approve(s.booker, 1, "true")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[case("maybe")]
#[case("")]
#[actix_web::test]
async fn approval_flag_must_be_boolean(#[case] flag: &str) {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;
    call_json(&app, create(s.booker, booking_body(s.item))).await;

    let (status, _) = call_json(&app, approve(s.owner, 1, flag)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn strangers_cannot_see_a_booking() {
    let s = seeded(true).await;
    let stranger = s.harness.user("Vera").await.id();
    let app = test::init_service(test_app(s.harness.state.clone())).await;
    call_json(&app, create(s.booker, booking_body(s.item))).await;

    let (owner_status, _) = call_json(&app, get(s.owner, "/bookings/1")).await;
    let (stranger_status, missing) = call_json(&app, get(stranger, "/bookings/1")).await;
    let (absent_status, absent) = call_json(&app, get(s.owner, "/bookings/99")).await;

    assert_eq!(owner_status, StatusCode::OK);
    assert_eq!(stranger_status, StatusCode::NOT_FOUND);
    assert_eq!(absent_status, StatusCode::NOT_FOUND);
    assert_eq!(missing["code"], absent["code"]);
}

#[rstest]
#[actix_web::test]
async fn unknown_state_keyword_is_reported() {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;

    let (status, body) = call_json(&app, get(s.booker, "/bookings?state=SOMETIME")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "unknown_state");
    assert_eq!(body["message"], "Unknown state: SOMETIME");
    assert_eq!(body["details"], json!({ "state": "SOMETIME" }));
}

#[rstest]
#[case("/bookings?from=-1")]
#[case("/bookings/owner?size=0")]
#[case("/bookings?from=abc")]
#[actix_web::test]
async fn bad_page_parameters_are_rejected(#[case] uri: &str) {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;

    let (status, body) = call_json(&app, get(s.booker, uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn lists_follow_the_lifecycle_over_time() {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;
    call_json(&app, create(s.booker, booking_body(s.item))).await;

    let (_, waiting) = call_json(&app, get(s.booker, "/bookings?state=WAITING")).await;
    let (_, future) = call_json(&app, get(s.owner, "/bookings/owner?state=FUTURE")).await;
    assert_eq!(ids(&waiting), vec![1]);
    assert_eq!(ids(&future), vec![1]);

    call_json(&app, approve(s.owner, 1, "true")).await;
    s.harness.clock.advance(Duration::hours(36));

    let (_, current) = call_json(&app, get(s.owner, "/bookings/owner?state=CURRENT")).await;
    let (_, still_waiting) = call_json(&app, get(s.booker, "/bookings?state=WAITING")).await;
    let (_, owner_as_booker) = call_json(&app, get(s.owner, "/bookings")).await;
    assert_eq!(ids(&current), vec![1]);
    assert!(ids(&still_waiting).is_empty());
    assert!(ids(&owner_as_booker).is_empty());
}

#[rstest]
#[actix_web::test]
async fn list_pages_are_newest_first() {
    let s = seeded(true).await;
    let app = test::init_service(test_app(s.harness.state.clone())).await;
    for day in 2..=6 {
        let body = json!({
            "itemId": s.item.get(),
            "start": format!("2026-03-0{day}T09:00:00Z"),
            "end": format!("2026-03-0{day}T18:00:00Z"),
        });
        call_json(&app, create(s.booker, body)).await;
    }

    let (_, first) = call_json(&app, get(s.booker, "/bookings?from=0&size=2")).await;
    let (_, second) = call_json(&app, get(s.booker, "/bookings?from=2&size=2")).await;

    assert_eq!(ids(&first), vec![5, 4]);
    assert_eq!(ids(&second), vec![3, 2]);
}
