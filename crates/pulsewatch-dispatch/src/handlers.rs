// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server-side dispatch endpoints (§4.6): signed poll/report HTTP handlers
//! backed directly by the [`pulsewatch_scheduler::Scheduler`] and a
//! [`pulsewatch_core::HealthRepository`].

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use pulsewatch_core::{HealthRepository, HealthStatus};
use pulsewatch_scheduler::{Scheduler, SchedulerError};

use crate::error::DispatchError;
use crate::hmac_sig::{self, MAX_CLOCK_SKEW_SECS};
use crate::types::{PollRequest, PollResponse, ReportRequest};

pub const POLL_PATH: &str = "/internal/worker/jobs/poll";
pub const REPORT_PATH: &str = "/internal/worker/jobs/report";

/// TTL a reported health record is stored under (§4.6): shorter than the
/// internal worker's `3 * timeout_sec`, since a remote worker's next report
/// is the only signal the server has that it is still alive.
const REPORT_TTL_SEC: i64 = 300;

/// State the dispatch routes need, independent of whatever else a server
/// binary's own application state carries.
#[derive(Clone)]
pub struct DispatchState {
	pub scheduler: Arc<Scheduler>,
	pub health: Arc<dyn HealthRepository>,
	/// `None` disables authentication (§6.2 development mode).
	pub worker_key: Option<String>,
}

/// Builds a fully-formed sub-router for the two dispatch routes, already
/// bound to `state`. A server binary merges this into its own router.
pub fn router(state: DispatchState) -> Router {
	Router::new()
		.route(POLL_PATH, post(poll))
		.route(REPORT_PATH, post(report))
		.with_state(state)
}

/// Verifies the HMAC headers per §6.2. A `None` key means authentication is
/// disabled (development mode) and every request passes.
fn authenticate(worker_key: Option<&str>, headers: &HeaderMap, method: &str, path: &str, body: &[u8]) -> Result<(), DispatchError> {
	let Some(key) = worker_key else {
		return Ok(());
	};

	let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

	let worker_id = header_str("X-Worker-Id").ok_or(DispatchError::Unauthorized)?;
	let timestamp_raw = header_str("X-Worker-Timestamp").ok_or(DispatchError::Unauthorized)?;
	let signature = header_str("X-Worker-Signature").ok_or(DispatchError::Unauthorized)?;

	let timestamp: i64 = timestamp_raw.parse().map_err(|_| DispatchError::Unauthorized)?;
	if (Utc::now().timestamp() - timestamp).abs() > MAX_CLOCK_SKEW_SECS {
		return Err(DispatchError::Unauthorized);
	}

	if !hmac_sig::verify(key.as_bytes(), timestamp, worker_id, method, path, body, signature) {
		return Err(DispatchError::Unauthorized);
	}

	Ok(())
}

#[tracing::instrument(skip(state, headers, body))]
async fn poll(State(state): State<DispatchState>, headers: HeaderMap, body: Bytes) -> Result<Response, DispatchError> {
	authenticate(state.worker_key.as_deref(), &headers, "POST", POLL_PATH, &body)?;

	let request: PollRequest = serde_json::from_slice(&body).map_err(|e| DispatchError::BadRequest(e.to_string()))?;
	tracing::debug!(worker_id = %request.worker_id, "worker polling for a job");

	match state.scheduler.try_next_job() {
		Ok(Some(job)) => Ok((StatusCode::OK, Json(PollResponse::from(&job))).into_response()),
		Ok(None) => Ok(StatusCode::NO_CONTENT.into_response()),
		Err(SchedulerError::Closed) => Err(DispatchError::SchedulerClosed),
		Err(SchedulerError::Cancelled) => Ok(StatusCode::NO_CONTENT.into_response()),
		Err(SchedulerError::Bootstrap(e)) => Err(DispatchError::Backend(e)),
	}
}

#[tracing::instrument(skip(state, headers, body))]
async fn report(State(state): State<DispatchState>, headers: HeaderMap, body: Bytes) -> Result<Response, DispatchError> {
	authenticate(state.worker_key.as_deref(), &headers, "POST", REPORT_PATH, &body)?;

	let request: ReportRequest = serde_json::from_slice(&body).map_err(|e| DispatchError::BadRequest(e.to_string()))?;
	if request.device_id.is_empty() {
		return Err(DispatchError::BadRequest("device_id is required".to_string()));
	}

	let last_check = request
		.last_check
		.filter(|t| *t != pulsewatch_core::zero_time())
		.unwrap_or_else(Utc::now);

	let status = HealthStatus {
		device_id: request.device_id,
		status: request.status,
		latency_ms: request.latency_ms,
		last_check,
		runner: request.worker_id,
		data: Default::default(),
	};

	state.health.save(status, REPORT_TTL_SEC).await?;
	Ok(StatusCode::NO_CONTENT.into_response())
}
