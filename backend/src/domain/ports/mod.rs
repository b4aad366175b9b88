//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters and
//! expose typed errors built with `define_port_error!`. Driving ports
//! (`*Command`, `*Query`) are implemented by domain services and return the
//! domain [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod booking_command;
mod booking_query;
mod booking_repository;
mod catalogue;
mod comment_repository;
mod item_repository;
mod user_repository;

#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::{BookingCommand, CreateBookingRequest, SetApprovalRequest};
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::{BookingQuery, GetBookingRequest, ListBookingsRequest};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{
    BookingRepository, BookingRepositoryError, FixtureBookingRepository, StatusTransition,
};
#[cfg(test)]
pub use catalogue::{MockCatalogueCommand, MockCatalogueQuery};
pub use catalogue::{
    AddCommentRequest, BookingRef, CatalogueCommand, CatalogueQuery, CreateItemRequest,
    ItemDetails, ItemDetailsRequest, OwnerItemsRequest, RegisterUserRequest, SearchItemsRequest,
    UpdateItemRequest, UpdateUserRequest,
};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{
    CommentPersistenceError, CommentRepository, FixtureCommentRepository,
};
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{FixtureItemRepository, ItemPersistenceError, ItemRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    FixtureUserRepository, UserPersistenceError, UserRemoval, UserRepository,
};
