//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. When a migration
//! changes the schema, regenerate them with `diesel print-schema` or update
//! them by hand.

diesel::table! {
    /// Application users. Neither column is unique.
    users (id) {
        /// Primary key assigned by a sequence.
        id -> Int8,
        name -> Varchar,
        email -> Varchar,
    }
}

diesel::table! {
    /// Payments keyed by their caller-supplied external identifier.
    ///
    /// `external_id` carries the `payments_external_id_key` unique
    /// constraint that makes payment creation idempotent.
    payments (id) {
        /// Primary key assigned by a sequence.
        id -> Int8,
        external_id -> Varchar,
        /// Amount in minor units.
        amount -> Int8,
        /// Settlement status; defaults to `SUCCESS`.
        status -> Varchar,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, payments);
