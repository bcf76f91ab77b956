// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly, following the reference
//! codebase's `create_app_state`/`create_router` split so `main.rs` stays a
//! thin wiring layer.

use std::sync::Arc;

use axum::Router;
use pulsewatch_core::{DeviceRepository, HealthRepository};
use pulsewatch_dispatch::DispatchState;
use pulsewatch_engine::CheckEngine;
use pulsewatch_scheduler::Scheduler;

use crate::routes;

/// Shared, immutable state handed to every Axum handler.
#[derive(Clone)]
pub struct AppState {
	pub devices: Arc<dyn DeviceRepository>,
	pub health: Arc<dyn HealthRepository>,
	pub scheduler: Arc<Scheduler>,
	pub engine: Arc<CheckEngine>,
}

/// Builds [`AppState`] from its already-constructed collaborators. Kept as
/// a free function (rather than a constructor on the struct) to mirror the
/// reference server's `create_app_state`.
pub fn create_app_state(devices: Arc<dyn DeviceRepository>, health: Arc<dyn HealthRepository>, scheduler: Arc<Scheduler>, engine: Arc<CheckEngine>) -> AppState {
	AppState {
		devices,
		health,
		scheduler,
		engine,
	}
}

/// Assembles the full router: the public device/health REST surface plus
/// the authenticated internal dispatch endpoints (§4.6), both backed by
/// the same scheduler and health store.
pub fn create_router(state: AppState, worker_key: Option<String>) -> Router {
	let dispatch_state = DispatchState {
		scheduler: Arc::clone(&state.scheduler),
		health: Arc::clone(&state.health),
		worker_key,
	};

	Router::new()
		.merge(routes::health::router())
		.merge(routes::devices::router(state))
		.merge(pulsewatch_dispatch::router(dispatch_state))
}
