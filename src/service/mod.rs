//! Service layer: business logic orchestration.
//!
//! [`RosterService`] turns API requests into store calls and owns the spin
//! draw. It holds no state of its own beyond the store handle.

pub mod roster_service;

pub use roster_service::RosterService;
