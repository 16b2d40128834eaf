//! REST endpoint handlers organized by resource.

pub mod history;
pub mod spin;
pub mod statistics;
pub mod students;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(students::routes())
        .merge(spin::routes())
        .merge(history::routes())
        .merge(statistics::routes())
}
