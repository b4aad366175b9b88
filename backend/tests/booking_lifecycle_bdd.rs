//! Behavioural coverage for the booking lifecycle over HTTP.
//!
//! The world owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix test services rely on `spawn_local`.

use std::cell::RefCell;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::{App, web};
use chrono::TimeDelta;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use shareit::Trace;
use shareit::inbound::http::configure;
use shareit::inbound::http::state::{HttpState, Repositories};
use shareit::outbound::memory::InMemoryStore;
use shareit::test_support::clock::{MutableClock, fixture_now};

const ACTOR_HEADER: &str = "X-Sharer-User-Id";

struct Response {
    status: StatusCode,
    body: Value,
}

struct LifecycleWorld {
    runtime: Runtime,
    local: LocalSet,
    clock: Arc<MutableClock>,
    state: web::Data<HttpState>,
    owner: RefCell<Option<i64>>,
    booker: RefCell<Option<i64>>,
    item: RefCell<Option<i64>>,
    booking: RefCell<Option<i64>>,
    last: RefCell<Option<Response>>,
}

enum Method {
    Get,
    Post(Value),
    Patch,
}

impl LifecycleWorld {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("create runtime");
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(fixture_now()));
        let state = HttpState::from_repositories(
            Repositories {
                users: store.clone(),
                items: store.clone(),
                bookings: store.clone(),
                comments: store,
            },
            clock.clone(),
        );
        Self {
            runtime,
            local: LocalSet::new(),
            clock,
            state: web::Data::new(state),
            owner: RefCell::new(None),
            booker: RefCell::new(None),
            item: RefCell::new(None),
            booking: RefCell::new(None),
            last: RefCell::new(None),
        }
    }

    fn send(&self, method: Method, uri: &str, actor: Option<i64>) -> Response {
        let state = self.state.clone();
        let uri = uri.to_owned();
        self.local.block_on(&self.runtime, async move {
            let app = actix_test::init_service(
                App::new()
                    .app_data(state)
                    .wrap(Trace)
                    .configure(configure),
            )
            .await;
            let req = match method {
                Method::Get => actix_test::TestRequest::get(),
                Method::Post(body) => actix_test::TestRequest::post().set_json(body),
                Method::Patch => actix_test::TestRequest::patch(),
            };
            let req = match actor {
                Some(id) => req.insert_header((ACTOR_HEADER, id.to_string())),
                None => req,
            };
            let res = actix_test::call_service(&app, req.uri(&uri).to_request()).await;
            let status = res.status();
            let bytes = actix_test::read_body(res).await;
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).expect("JSON response body")
            };
            Response { status, body }
        })
    }

    fn register(&self, name: &str) -> i64 {
        let res = self.send(
            Method::Post(json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
            })),
            "/users",
            None,
        );
        assert_eq!(res.status, StatusCode::CREATED);
        res.body["id"].as_i64().expect("user id")
    }

    fn id(slot: &RefCell<Option<i64>>, what: &str) -> i64 {
        (*slot.borrow()).unwrap_or_else(|| panic!("{what} not set up"))
    }

    fn request_booking(&self, actor: i64) {
        let now = fixture_now();
        let body = json!({
            "itemId": Self::id(&self.item, "item"),
            "start": (now + TimeDelta::days(1)).to_rfc3339(),
            "end": (now + TimeDelta::days(2)).to_rfc3339(),
        });
        let res = self.send(Method::Post(body), "/bookings", Some(actor));
        if res.status == StatusCode::CREATED {
            *self.booking.borrow_mut() = res.body["id"].as_i64();
        }
        *self.last.borrow_mut() = Some(res);
    }

    fn decide(&self, approved: bool) {
        let uri = format!(
            "/bookings/{}?approved={approved}",
            Self::id(&self.booking, "booking")
        );
        let res = self.send(Method::Patch, &uri, Some(Self::id(&self.owner, "owner")));
        *self.last.borrow_mut() = Some(res);
    }

    fn list(&self, uri: &str, actor: i64) -> Response {
        self.send(Method::Get, uri, Some(actor))
    }

    fn booking_status(&self) -> Value {
        let uri = format!("/bookings/{}", Self::id(&self.booking, "booking"));
        let res = self.send(Method::Get, &uri, Some(Self::id(&self.booker, "booker")));
        assert_eq!(res.status, StatusCode::OK);
        res.body["status"].clone()
    }
}

#[fixture]
fn world() -> LifecycleWorld {
    LifecycleWorld::new()
}

#[given("an owner with an available item")]
fn an_owner_with_an_available_item(world: &LifecycleWorld) {
    let owner = world.register("Olga");
    let res = world.send(
        Method::Post(json!({
            "name": "Kayak",
            "description": "Two seats",
            "available": true,
        })),
        "/items",
        Some(owner),
    );
    assert_eq!(res.status, StatusCode::CREATED);
    *world.owner.borrow_mut() = Some(owner);
    *world.item.borrow_mut() = res.body["id"].as_i64();
}

#[given("a registered booker")]
fn a_registered_booker(world: &LifecycleWorld) {
    let booker = world.register("Boris");
    *world.booker.borrow_mut() = Some(booker);
}

#[when("the booker requests the item from one day to two days ahead")]
fn the_booker_requests_the_item(world: &LifecycleWorld) {
    world.request_booking(LifecycleWorld::id(&world.booker, "booker"));
}

#[when("the owner requests their own item from one day to two days ahead")]
fn the_owner_requests_their_own_item(world: &LifecycleWorld) {
    world.request_booking(LifecycleWorld::id(&world.owner, "owner"));
}

#[when("the owner approves the booking")]
fn the_owner_approves_the_booking(world: &LifecycleWorld) {
    world.decide(true);
}

#[when("the owner rejects the booking")]
fn the_owner_rejects_the_booking(world: &LifecycleWorld) {
    world.decide(false);
}

#[when("the clock moves into the booking period")]
fn the_clock_moves_into_the_booking_period(world: &LifecycleWorld) {
    world.clock.advance(TimeDelta::hours(36));
}

#[when("the booker lists bookings in state {state}")]
fn the_booker_lists_bookings_in_state(world: &LifecycleWorld, state: String) {
    let res = world.list(
        &format!("/bookings?state={state}"),
        LifecycleWorld::id(&world.booker, "booker"),
    );
    *world.last.borrow_mut() = Some(res);
}

#[then("the booking is {status}")]
fn the_booking_is(world: &LifecycleWorld, status: String) {
    assert_eq!(world.booking_status(), Value::String(status));
}

#[then("the request fails with {code}")]
fn the_request_fails_with(world: &LifecycleWorld, code: String) {
    let last = world.last.borrow();
    let res = last.as_ref().expect("a request was made");
    assert!(res.status.is_client_error(), "status {}", res.status);
    assert_eq!(res.body["code"], Value::String(code));
}

#[then("the owner's CURRENT bookings contain the booking")]
fn the_owners_current_bookings_contain_the_booking(world: &LifecycleWorld) {
    let res = world.list(
        "/bookings/owner?state=CURRENT",
        LifecycleWorld::id(&world.owner, "owner"),
    );
    assert_eq!(res.status, StatusCode::OK);
    let ids: Vec<i64> = res
        .body
        .as_array()
        .expect("booking list")
        .iter()
        .filter_map(|b| b["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![LifecycleWorld::id(&world.booking, "booking")]);
}

#[then("the booker's WAITING bookings are empty")]
fn the_bookers_waiting_bookings_are_empty(world: &LifecycleWorld) {
    let res = world.list(
        "/bookings?state=WAITING",
        LifecycleWorld::id(&world.booker, "booker"),
    );
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!([]));
}

#[scenario(
    path = "tests/features/booking_lifecycle.feature",
    name = "Owner approves a booking exactly once"
)]
fn owner_approves_a_booking_exactly_once(world: LifecycleWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/booking_lifecycle.feature",
    name = "Owners cannot book their own items"
)]
fn owners_cannot_book_their_own_items(world: LifecycleWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/booking_lifecycle.feature",
    name = "Unknown state keywords are rejected"
)]
fn unknown_state_keywords_are_rejected(world: LifecycleWorld) {
    drop(world);
}
