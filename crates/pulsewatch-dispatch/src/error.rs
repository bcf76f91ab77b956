// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors a dispatch handler can surface, mapped to the status codes §4.6
/// and §7 specify. No body detail is returned on auth failure, per §6.2.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
	#[error("unauthorized")]
	Unauthorized,

	#[error("bad request: {0}")]
	BadRequest(String),

	#[error("scheduler closed")]
	SchedulerClosed,

	#[error("backend error: {0}")]
	Backend(#[from] pulsewatch_core::RepositoryError),
}

impl IntoResponse for DispatchError {
	fn into_response(self) -> Response {
		let status = match &self {
			DispatchError::Unauthorized => StatusCode::UNAUTHORIZED,
			DispatchError::BadRequest(_) => StatusCode::BAD_REQUEST,
			DispatchError::SchedulerClosed => StatusCode::SERVICE_UNAVAILABLE,
			DispatchError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
		};

		if matches!(self, DispatchError::Unauthorized) {
			tracing::warn!("dispatch request failed authentication");
		} else {
			tracing::error!(error = %self, "dispatch request failed");
		}

		status.into_response()
	}
}
