//! Domain primitives, services, and ports.
//!
//! Purpose: hold the booking lifecycle and temporal query rules independent
//! of transport and storage. Inbound adapters call the driving ports
//! implemented by the services here; the services reach storage only
//! through the driven ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Booking, BookingStatus, BookingState, BookingFilter: the booking
//!   aggregate, its state machine, and list partitions.
//! - BookingService, BookingQueryService, CatalogueService: driving port
//!   implementations.

pub mod access;
pub mod booking;
pub mod booking_query_service;
pub mod booking_service;
pub mod catalogue_service;
pub mod comment;
pub mod error;
pub mod ids;
pub mod item;
pub mod item_booking_summary;
pub mod ports;
mod service_errors;
pub mod trace_id;
pub mod user;

pub use self::booking::{
    BookedItem, Booking, BookingFilter, BookingPeriod, BookingState, BookingStatus,
    BookingValidationError, NewBooking, ParseBookingStatusError,
};
pub use self::booking_query_service::{BookingQueryService, classify_state};
pub use self::booking_service::BookingService;
pub use self::catalogue_service::CatalogueService;
pub use self::comment::{Comment, EmptyCommentText, NewComment};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{BookingId, CommentId, InvalidId, ItemId, UserId};
pub use self::item::{Item, ItemPatch, ItemValidationError, NewItem};
pub use self::item_booking_summary::{ItemBookingSummarizer, ItemBookingSummary};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, User, UserPatch, UserValidationError};
