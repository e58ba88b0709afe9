//! HTTP error response mapping.

use std::num::ParseIntError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use minibridge_domain::characteristic::UnknownCharacteristic;
use minibridge_domain::device_kind::UnknownDeviceKind;
use minibridge_domain::error::BridgeError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    Bridge(BridgeError),
    UnknownKind(UnknownDeviceKind),
    UnknownCharacteristic(UnknownCharacteristic),
    InvalidId(ParseIntError),
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        Self::Bridge(err)
    }
}

impl From<UnknownDeviceKind> for ApiError {
    fn from(err: UnknownDeviceKind) -> Self {
        Self::UnknownKind(err)
    }
}

impl From<UnknownCharacteristic> for ApiError {
    fn from(err: UnknownCharacteristic) -> Self {
        Self::UnknownCharacteristic(err)
    }
}

impl From<ParseIntError> for ApiError {
    fn from(err: ParseIntError) -> Self {
        Self::InvalidId(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Bridge(
                BridgeError::MalformedMessage(_)
                | BridgeError::InvalidCharacteristicValue { .. }
                | BridgeError::UnsupportedCharacteristic { .. },
            )
            | Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::Bridge(BridgeError::NotFound { .. })
            | Self::UnknownKind(_)
            | Self::UnknownCharacteristic(_) => StatusCode::NOT_FOUND,
            Self::Bridge(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Bridge(err) if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(error = %err, "bridge error");
                "internal server error".to_string()
            }
            Self::Bridge(err) => err.to_string(),
            Self::UnknownKind(err) => err.to_string(),
            Self::UnknownCharacteristic(err) => err.to_string(),
            Self::InvalidId(err) => format!("invalid accessory id: {err}"),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
