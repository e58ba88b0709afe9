//! JSON REST API handlers.
//!
//! Each sub-module implements handlers for a specific resource type.
//! All handlers return JSON responses and use [`ApiError`](crate::error::ApiError)
//! for error mapping.

#[allow(clippy::missing_errors_doc)]
pub mod accessories;
#[allow(clippy::missing_errors_doc)]
pub mod characteristics;
pub mod sse;
pub mod stats;

use axum::Router;
use axum::routing::get;

use minibridge_app::ports::{CapabilitySink, CommandSender};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, C>() -> Router<AppState<S, C>>
where
    S: CapabilitySink + 'static,
    C: CommandSender + 'static,
{
    Router::new()
        .route("/accessories", get(accessories::list::<S, C>))
        .route("/accessories/{kind}/{id}", get(accessories::get::<S, C>))
        .route(
            "/accessories/{kind}/{id}/characteristics/{name}",
            get(characteristics::read::<S, C>).put(characteristics::write::<S, C>),
        )
        .route("/stats", get(stats::get::<S, C>))
        .route("/updates/stream", get(sse::stream::<S, C>))
}
