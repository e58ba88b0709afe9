//! Bridge counters.

use axum::Json;
use axum::extract::State;

use minibridge_app::ports::{CapabilitySink, CommandSender};
use minibridge_app::services::bridge_service::BridgeStats;

use crate::state::AppState;

/// `GET /api/stats`
pub async fn get<S, C>(State(state): State<AppState<S, C>>) -> Json<BridgeStats>
where
    S: CapabilitySink + 'static,
    C: CommandSender + 'static,
{
    Json(state.bridge.stats())
}
