//! Characteristic reads and writes coming from the hub.
//!
//! A read answers from the cached state and asks the controller for a fresh
//! value in the background. A write is validated, sent to the controller and
//! pushed back to every hub subscriber.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use minibridge_app::ports::{CapabilitySink, CommandSender};
use minibridge_domain::characteristic::{Characteristic, CharacteristicValue};

use crate::api::accessories::locate;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CharacteristicBody {
    pub characteristic: Characteristic,
    pub value: CharacteristicValue,
}

/// Request body for a write.
#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    pub value: CharacteristicValue,
}

/// Result of a write: the frames sent to the controller, in order.
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub characteristic: Characteristic,
    pub sent: Vec<String>,
}

/// `GET /api/accessories/{kind}/{id}/characteristics/{name}`
pub async fn read<S, C>(
    State(state): State<AppState<S, C>>,
    Path((kind, id, name)): Path<(String, String, String)>,
) -> Result<Json<CharacteristicBody>, ApiError>
where
    S: CapabilitySink + 'static,
    C: CommandSender + 'static,
{
    let accessory = locate(&state, &kind, &id)?;
    let characteristic: Characteristic = name.parse()?;
    let value = accessory.handle_hub_get(characteristic)?;
    Ok(Json(CharacteristicBody {
        characteristic,
        value,
    }))
}

/// `PUT /api/accessories/{kind}/{id}/characteristics/{name}`
pub async fn write<S, C>(
    State(state): State<AppState<S, C>>,
    Path((kind, id, name)): Path<(String, String, String)>,
    Json(request): Json<WriteRequest>,
) -> Result<Json<WriteResponse>, ApiError>
where
    S: CapabilitySink + 'static,
    C: CommandSender + 'static,
{
    let accessory = locate(&state, &kind, &id)?;
    let characteristic: Characteristic = name.parse()?;
    let sent = accessory
        .handle_hub_set(characteristic, request.value)?
        .iter()
        .map(|message| message.encode())
        .collect();
    Ok(Json(WriteResponse {
        characteristic,
        sent,
    }))
}
