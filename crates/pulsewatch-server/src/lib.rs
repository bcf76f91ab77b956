// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pulsewatch's HTTP server: the device/health REST surface (§6.4), the
//! scheduler and check engine that back it, and the authenticated
//! remote-worker dispatch endpoints (§4.6) mounted alongside it.

pub mod api;
pub mod error;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use error::ServerError;
