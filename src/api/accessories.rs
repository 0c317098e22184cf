//! Accessory API endpoints
//!
//! Stand-in for the host's characteristic callbacks: list published
//! accessories and write power, input, remote key, volume and mute.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::Error;
use crate::accessory::{InputSource, RokuAccessory, TelevisionState, VolumeDirection};
use crate::roku::RemoteKey;

/// REST response describing one accessory
#[derive(Serialize)]
pub struct AccessoryResponse {
    pub id: String,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub firmware_revision: String,
    pub is_tv: bool,
    pub state: TelevisionState,
    pub inputs: Vec<InputSource>,
}

impl AccessoryResponse {
    async fn from_accessory(accessory: &RokuAccessory) -> Self {
        let descriptor = accessory.descriptor();
        Self {
            id: descriptor.id,
            name: descriptor.name,
            manufacturer: descriptor.manufacturer,
            model: descriptor.model,
            firmware_revision: descriptor.firmware_revision,
            is_tv: accessory.info().is_tv,
            state: accessory.state().await,
            inputs: descriptor.inputs,
        }
    }
}

/// Error body for failed writes
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(e: &Error) -> ApiError {
    let status = match e {
        Error::UnknownInput(_) | Error::AccessoryNotFound(_) => StatusCode::NOT_FOUND,
        Error::Http(_) | Error::Device(_) | Error::Xml(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn find(state: &ApiState, id: &str) -> Result<Arc<RokuAccessory>, ApiError> {
    state
        .accessory(id)
        .ok_or_else(|| api_error(&Error::AccessoryNotFound(id.to_string())))
}

#[derive(Deserialize)]
pub struct ActiveBody {
    pub active: bool,
}

#[derive(Deserialize)]
pub struct InputBody {
    pub identifier: i32,
}

#[derive(Deserialize)]
pub struct KeyBody {
    pub key: RemoteKey,
}

#[derive(Deserialize)]
pub struct VolumeBody {
    pub direction: VolumeDirection,
}

#[derive(Deserialize)]
pub struct MuteBody {
    pub muted: bool,
}

/// Build accessory routes
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(list_accessories))
        .route("/{id}", get(get_accessory))
        .route("/{id}/active", post(set_active))
        .route("/{id}/input", post(set_input))
        .route("/{id}/key", post(press_key))
        .route("/{id}/volume", post(set_volume))
        .route("/{id}/mute", post(set_mute))
        .with_state(state)
}

/// List all published accessories
async fn list_accessories(State(state): State<Arc<ApiState>>) -> Json<Vec<AccessoryResponse>> {
    let mut out = Vec::with_capacity(state.accessories.len());
    for accessory in &state.accessories {
        out.push(AccessoryResponse::from_accessory(accessory).await);
    }
    Json(out)
}

/// Get one accessory
async fn get_accessory(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<AccessoryResponse>, ApiError> {
    let accessory = find(&state, &id)?;
    Ok(Json(AccessoryResponse::from_accessory(&accessory).await))
}

async fn set_active(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<ActiveBody>,
) -> Result<Json<TelevisionState>, ApiError> {
    let accessory = find(&state, &id)?;
    accessory
        .set_active(body.active)
        .await
        .map_err(|e| api_error(&e))?;
    Ok(Json(accessory.state().await))
}

async fn set_input(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<InputBody>,
) -> Result<Json<TelevisionState>, ApiError> {
    let accessory = find(&state, &id)?;
    accessory
        .set_active_identifier(body.identifier)
        .await
        .map_err(|e| api_error(&e))?;
    Ok(Json(accessory.state().await))
}

async fn press_key(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<KeyBody>,
) -> Result<StatusCode, ApiError> {
    let accessory = find(&state, &id)?;
    accessory
        .remote_key(body.key)
        .await
        .map_err(|e| api_error(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_volume(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<VolumeBody>,
) -> Result<StatusCode, ApiError> {
    let accessory = find(&state, &id)?;
    accessory
        .set_volume(body.direction)
        .await
        .map_err(|e| api_error(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_mute(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<MuteBody>,
) -> Result<Json<TelevisionState>, ApiError> {
    let accessory = find(&state, &id)?;
    accessory
        .set_mute(body.muted)
        .await
        .map_err(|e| api_error(&e))?;
    Ok(Json(accessory.state().await))
}
