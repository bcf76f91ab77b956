// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! REST error taxonomy (§7): input errors surface as 400, missing
//! resources as 404, backend failures as 500 — no further detail leaks to
//! the caller beyond the message, matching the dispatch error convention in
//! `pulsewatch-dispatch`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("not found: {0}")]
	NotFound(String),

	#[error("backend error: {0}")]
	Backend(#[from] pulsewatch_core::RepositoryError),
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let status = match &self {
			ServerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
			ServerError::NotFound(_) => StatusCode::NOT_FOUND,
			ServerError::Backend(pulsewatch_core::RepositoryError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
			ServerError::Backend(pulsewatch_core::RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
			ServerError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
		};

		if status == StatusCode::INTERNAL_SERVER_ERROR {
			tracing::error!(error = %self, "request failed");
		} else {
			tracing::debug!(error = %self, "request rejected");
		}

		(status, Json(json!({ "error": self.to_string() }))).into_response()
	}
}
