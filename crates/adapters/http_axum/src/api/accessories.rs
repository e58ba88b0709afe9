//! Accessory listing and lookup.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};

use minibridge_app::ports::{CapabilitySink, CommandSender};
use minibridge_app::services::accessory_service::Accessory;
use minibridge_domain::device_kind::DeviceKind;
use minibridge_domain::id::InstanceId;
use minibridge_domain::state::DeviceSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the `{kind}/{id}` path segments to a configured accessory.
pub(crate) fn locate<'a, S, C>(
    state: &'a AppState<S, C>,
    kind: &str,
    id: &str,
) -> Result<&'a Arc<Accessory<S, C>>, ApiError>
where
    S: CapabilitySink,
    C: CommandSender,
{
    let kind: DeviceKind = kind.parse()?;
    let id: InstanceId = id.parse()?;
    Ok(state.bridge.accessory(kind, id)?)
}

/// `GET /api/accessories`
pub async fn list<S, C>(State(state): State<AppState<S, C>>) -> Json<Vec<DeviceSnapshot>>
where
    S: CapabilitySink + 'static,
    C: CommandSender + 'static,
{
    Json(state.bridge.snapshots())
}

/// `GET /api/accessories/{kind}/{id}`
pub async fn get<S, C>(
    State(state): State<AppState<S, C>>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<DeviceSnapshot>, ApiError>
where
    S: CapabilitySink + 'static,
    C: CommandSender + 'static,
{
    let accessory = locate(&state, &kind, &id)?;
    Ok(Json(accessory.snapshot()))
}
