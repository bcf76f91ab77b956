// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `GET /health` (§6.4): process liveness, independent of device health.

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

pub fn router() -> Router {
	Router::new().route("/health", get(health))
}

async fn health() -> StatusCode {
	StatusCode::OK
}
