// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Device CRUD and health-retrieval REST glue (§6.4). Thin JSON handlers
//! over the repository traits and the scheduler — deliberately out of
//! core scope per §1, but fully wired up here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use pulsewatch_core::{CheckJob, Device, DEFAULT_CHECK_METHOD, DEFAULT_INTERVAL_SEC};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::AppState;
use crate::error::ServerError;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/devices", post(create_device).get(list_devices))
		.route("/devices/{id}", get(get_device_health).delete(delete_device))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
struct CreateDeviceRequest {
	address: String,
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	check_method: Option<String>,
	#[serde(default)]
	interval_sec: Option<i64>,
}

#[tracing::instrument(skip(state, request))]
async fn create_device(State(state): State<AppState>, Json(request): Json<CreateDeviceRequest>) -> Result<(StatusCode, Json<Device>), ServerError> {
	if request.address.trim().is_empty() {
		return Err(ServerError::InvalidInput("address is required".to_string()));
	}

	let check_method = request.check_method.filter(|m| !m.is_empty()).unwrap_or_else(|| DEFAULT_CHECK_METHOD.to_string());
	let interval_sec = request.interval_sec.unwrap_or(DEFAULT_INTERVAL_SEC);
	if interval_sec <= 0 {
		return Err(ServerError::InvalidInput(format!("interval_sec must be positive, got {interval_sec}")));
	}

	let mut device = Device::new(request.address, check_method, interval_sec);
	if let Some(name) = request.name.filter(|n| !n.is_empty()) {
		device.name = name;
	}

	let saved = state.devices.save(device).await?;
	// New/changed devices run immediately (§4.1 Add).
	state.scheduler.add(CheckJob::from_device(&saved, Utc::now()));

	tracing::info!(device_id = %saved.id, address = %saved.address, method = %saved.check_method, "device created");
	Ok((StatusCode::CREATED, Json(saved)))
}

#[tracing::instrument(skip(state))]
async fn list_devices(State(state): State<AppState>) -> Result<Json<Vec<Device>>, ServerError> {
	Ok(Json(state.devices.list().await?))
}

/// `{"status": "unknown", "latency_ms": -1, "last_check": "unknown"}` (§6.3):
/// the skeleton returned when a device exists but has never been checked.
#[derive(Debug, Serialize)]
struct UnknownHealth {
	status: &'static str,
	latency_ms: i64,
	last_check: &'static str,
}

impl Default for UnknownHealth {
	fn default() -> Self {
		UnknownHealth {
			status: "unknown",
			latency_ms: -1,
			last_check: "unknown",
		}
	}
}

#[tracing::instrument(skip(state))]
async fn get_device_health(State(state): State<AppState>, Path(id): Path<String>) -> Result<axum::response::Response, ServerError> {
	use axum::response::IntoResponse;

	let Some(_device) = state.devices.get_by_id(&id).await? else {
		return Err(ServerError::NotFound(format!("device {id} not found")));
	};

	match state.health.get(&id).await? {
		Some(status) => Ok(Json(status).into_response()),
		None => Ok(Json(UnknownHealth::default()).into_response()),
	}
}

#[tracing::instrument(skip(state))]
async fn delete_device(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ServerError> {
	if state.devices.get_by_id(&id).await?.is_none() {
		return Err(ServerError::NotFound(format!("device {id} not found")));
	}

	state.devices.delete_by_id(&id).await?;
	state.health.delete(&id).await?;
	state.scheduler.remove(&id);

	tracing::info!(device_id = %id, "device deleted");
	Ok(StatusCode::NO_CONTENT)
}
