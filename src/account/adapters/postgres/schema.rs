//! Diesel schema for user accounts.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// Unique login name.
        #[max_length = 150]
        username -> Varchar,
        /// Optional contact address.
        #[max_length = 254]
        email -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
