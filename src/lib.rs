//! # roll-call
//!
//! REST backend for a classroom roster: students, presence status,
//! cumulative scores, a random / fair "spin" to pick who answers next,
//! and a log of past selections.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── RosterService (service/)
//!     ├── Spin draw (domain/selection)
//!     │
//!     ├── RosterStore trait (domain/)
//!     │     ├── PostgreSQL (persistence/)
//!     │     └── In-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
