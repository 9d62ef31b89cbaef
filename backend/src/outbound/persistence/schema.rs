//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, regenerate this file with
//! `diesel print-schema` against a migrated database or update it by hand.

diesel::table! {
    /// Accounts keyed by the upstream identity provider's identifier.
    users (id) {
        id -> Uuid,
        /// Identifier issued by the auth gateway (unique).
        external_id -> Varchar,
        name -> Nullable<Text>,
        email -> Nullable<Varchar>,
        login_method -> Nullable<Varchar>,
        /// One of `user`, `planner`, `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        last_signed_in -> Timestamptz,
    }
}

diesel::table! {
    /// Optional demographic profile, at most one per user.
    user_profiles (user_id) {
        user_id -> Uuid,
        age -> Nullable<Int2>,
        gender -> Nullable<Varchar>,
        address -> Nullable<Text>,
        prefecture -> Nullable<Varchar>,
        city -> Nullable<Varchar>,
        occupation -> Nullable<Varchar>,
        school_type -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    articles (id) {
        id -> Int8,
        title -> Varchar,
        content -> Text,
        category -> Varchar,
        prefecture -> Nullable<Varchar>,
        city -> Nullable<Varchar>,
        image_url -> Nullable<Text>,
        author_id -> Nullable<Uuid>,
        view_count -> Int8,
        published_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    events (id) {
        id -> Int8,
        title -> Varchar,
        description -> Text,
        event_date -> Timestamptz,
        venue -> Varchar,
        /// Ticket price in minor units.
        price_minor -> Int8,
        prefecture -> Nullable<Varchar>,
        city -> Nullable<Varchar>,
        image_url -> Nullable<Text>,
        capacity -> Nullable<Int4>,
        /// Remaining tickets; `NULL` means unlimited.
        available_tickets -> Nullable<Int4>,
        organizer_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    tickets (id) {
        id -> Int8,
        user_id -> Uuid,
        event_id -> Int8,
        qr_code -> Varchar,
        quantity -> Int4,
        total_price_minor -> Int8,
        is_used -> Bool,
        used_at -> Nullable<Timestamptz>,
        purchased_at -> Timestamptz,
    }
}

diesel::table! {
    gifts (id) {
        id -> Int8,
        store_name -> Varchar,
        gift_title -> Varchar,
        description -> Text,
        latitude -> Float8,
        longitude -> Float8,
        address -> Nullable<Text>,
        prefecture -> Nullable<Varchar>,
        city -> Nullable<Varchar>,
        image_url -> Nullable<Text>,
        expiry_date -> Nullable<Timestamptz>,
        usage_limit -> Int4,
        age_restriction -> Nullable<Int2>,
        school_type_restriction -> Varchar,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    gift_usages (id) {
        id -> Int8,
        user_id -> Uuid,
        gift_id -> Int8,
        qr_code -> Varchar,
        used_at -> Timestamptz,
    }
}

diesel::table! {
    /// Applied example data seeds, keyed by seed name.
    example_data_runs (seed_key) {
        seed_key -> Varchar,
        resident_count -> Int4,
        seed -> Int8,
        seeded_at -> Timestamptz,
    }
}

diesel::joinable!(user_profiles -> users (user_id));
diesel::joinable!(tickets -> events (event_id));
diesel::joinable!(tickets -> users (user_id));
diesel::joinable!(gift_usages -> gifts (gift_id));
diesel::joinable!(gift_usages -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    user_profiles,
    articles,
    events,
    tickets,
    gifts,
    gift_usages,
    example_data_runs,
);
