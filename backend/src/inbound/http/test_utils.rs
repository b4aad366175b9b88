//! Test helpers for the HTTP adapter: an app over the in-memory store with a
//! controllable clock.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::Value;

use crate::Trace;
use crate::domain::ports::{ItemRepository, UserRepository};
use crate::domain::{Item, NewItem, NewUser, User, UserId};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, Repositories};
use crate::outbound::memory::InMemoryStore;
use crate::test_support::clock::{MutableClock, fixture_now};

pub(crate) use crate::inbound::http::actor::ACTOR_HEADER;

/// Store, clock and wired state shared by one test.
pub(crate) struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    pub state: web::Data<HttpState>,
}

pub(crate) fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(MutableClock::new(fixture_now()));
    let state = HttpState::from_repositories(
        Repositories {
            users: store.clone(),
            items: store.clone(),
            bookings: store.clone(),
            comments: store.clone(),
        },
        clock.clone(),
    );
    Harness {
        store,
        clock,
        state: web::Data::new(state),
    }
}

pub(crate) fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).wrap(Trace).configure(configure)
}

impl Harness {
    pub(crate) async fn user(&self, name: &str) -> User {
        UserRepository::insert(
            self.store.as_ref(),
            NewUser::new(name, format!("{}@example.com", name.to_lowercase()))
                .expect("valid user"),
        )
        .await
        .expect("user stored")
    }

    pub(crate) async fn item(&self, owner: UserId, name: &str, available: bool) -> Item {
        ItemRepository::insert(
            self.store.as_ref(),
            NewItem::new(owner, name, format!("{name} for hire"), available).expect("valid item"),
        )
        .await
        .expect("item stored")
    }
}

/// Call the app and decode the JSON body, or `Value::Null` when empty.
pub(crate) async fn call_json<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&bytes).expect("JSON response body");
    (status, value)
}
