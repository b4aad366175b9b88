//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Registered users.
    users (id) {
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
    }
}

diesel::table! {
    /// Catalogue items; `owner_id` references `users`.
    items (id) {
        id -> Int8,
        owner_id -> Int8,
        name -> Varchar,
        description -> Text,
        available -> Bool,
    }
}

diesel::table! {
    /// Bookings. `status` holds `WAITING`, `APPROVED`, or `REJECTED`.
    bookings (id) {
        id -> Int8,
        item_id -> Int8,
        booker_id -> Int8,
        start_at -> Timestamptz,
        end_at -> Timestamptz,
        status -> Varchar,
    }
}

diesel::table! {
    /// Post-use item comments.
    comments (id) {
        id -> Int8,
        item_id -> Int8,
        author_id -> Int8,
        text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(items -> users (owner_id));
diesel::joinable!(bookings -> items (item_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, items, bookings, comments);
