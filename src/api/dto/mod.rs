//! Data Transfer Objects for REST request/response serialization.
//!
//! Request DTOs are deliberately lenient: absent fields fall back to the
//! defaults the endpoints document instead of being rejected.

pub mod common_dto;
pub mod history_dto;
pub mod spin_dto;
pub mod student_dto;

pub use common_dto::*;
pub use history_dto::*;
pub use spin_dto::*;
pub use student_dto::*;
