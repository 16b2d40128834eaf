//! Persistence layer: PostgreSQL-backed roster storage.
//!
//! [`postgres::PostgresStore`] implements [`crate::domain::RosterStore`]
//! on top of a `sqlx::PgPool`. [`schema`] creates the tables on startup
//! when they do not exist yet.

pub mod postgres;
pub mod schema;
