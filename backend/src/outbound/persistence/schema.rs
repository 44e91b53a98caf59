//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation.

diesel::table! {
    /// Registered users with their login credentials.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable display name (max 32 characters).
        display_name -> Varchar,
        /// Unique login email address.
        email -> Varchar,
        /// Encoded password hash owned by the identity gate.
        password_hash -> Varchar,
    }
}

diesel::table! {
    /// Posted gigs and their assignment state.
    gigs (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Title shown in listings (max 120 characters).
        title -> Varchar,
        /// Free-text description of the work.
        description -> Text,
        /// Offered budget in minor currency units.
        budget -> Int8,
        /// User who posted the gig.
        owner_id -> Uuid,
        /// Lifecycle state: `open` or `assigned`.
        status -> Varchar,
    }
}

diesel::table! {
    /// Bids placed against gigs.
    bids (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Gig the bid targets.
        gig_id -> Uuid,
        /// Freelancer who placed the bid.
        freelancer_id -> Uuid,
        /// Freelancer display label captured at creation time.
        freelancer_name -> Varchar,
        /// Free-text pitch.
        message -> Text,
        /// Lifecycle state: `pending`, `hired`, or `rejected`.
        status -> Varchar,
    }
}

diesel::joinable!(bids -> gigs (gig_id));

diesel::allow_tables_to_appear_in_same_query!(users, gigs, bids);
