// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end exercise of the REST surface against a real SQLite pool: a
//! created device is scheduled, picked up by an internal worker, checked
//! against a live TCP listener, and its health becomes visible over HTTP
//! (§8 end-to-end scenario 2, using a loopback listener instead of a real
//! external host).

use std::sync::Arc;
use std::time::Duration;

use pulsewatch_core::{DeviceRepository, HealthRepository};
use pulsewatch_engine::CheckEngine;
use pulsewatch_scheduler::Scheduler;
use pulsewatch_server::{create_app_state, create_router};
use pulsewatch_worker::{InternalWorker, Worker};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

async fn app_with_worker() -> (axum::Router, Arc<dyn DeviceRepository>, CancellationToken) {
	let pool = pulsewatch_db::testing::create_test_pool().await;
	let device_repo = Arc::new(pulsewatch_db::DeviceRepository::new(pool.clone()));
	let health_repo = Arc::new(pulsewatch_db::HealthRepository::new(pool));
	let devices: Arc<dyn DeviceRepository> = device_repo.clone();
	let health: Arc<dyn HealthRepository> = health_repo.clone();

	let scheduler = Arc::new(Scheduler::new());
	let engine = Arc::new(CheckEngine::new());
	let state = create_app_state(devices.clone(), health.clone(), scheduler.clone(), engine.clone());
	let app = create_router(state, None);

	let cancel = CancellationToken::new();
	let worker = InternalWorker::new("test-worker", scheduler, engine, health);
	let worker_cancel = cancel.clone();
	tokio::spawn(async move {
		let _ = worker.run(worker_cancel).await;
	});

	(app, devices, cancel)
}

#[tokio::test]
async fn created_device_becomes_up_once_an_internal_worker_checks_it() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		loop {
			if listener.accept().await.is_err() {
				return;
			}
		}
	});

	let (app, _devices, cancel) = app_with_worker().await;

	let create = axum::http::Request::builder()
		.method("POST")
		.uri("/devices")
		.header("content-type", "application/json")
		.body(axum::body::Body::from(format!(r#"{{"address":"{addr}","check_method":"tcp_check","interval_sec":30}}"#)))
		.unwrap();
	let response = app.clone().oneshot(create).await.unwrap();
	assert_eq!(response.status(), axum::http::StatusCode::CREATED);
	let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
	let device: pulsewatch_core::Device = serde_json::from_slice(&body).unwrap();

	let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
	loop {
		let get = axum::http::Request::builder()
			.method("GET")
			.uri(format!("/devices/{}", device.id))
			.body(axum::body::Body::empty())
			.unwrap();
		let response = app.clone().oneshot(get).await.unwrap();
		let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		let decoded: serde_json::Value = serde_json::from_slice(&body).unwrap();

		if decoded["status"] == "UP" {
			assert!(decoded["latency_ms"].as_i64().unwrap() < 1000);
			break;
		}

		if tokio::time::Instant::now() > deadline {
			panic!("device never became UP, last response: {decoded:?}");
		}
		tokio::time::sleep(Duration::from_millis(50)).await;
	}

	cancel.cancel();
}

#[tokio::test]
async fn get_health_returns_404_for_unknown_device() {
	let (app, _devices, cancel) = app_with_worker().await;

	let request = axum::http::Request::builder().method("GET").uri("/devices/does-not-exist").body(axum::body::Body::empty()).unwrap();
	let response = app.oneshot(request).await.unwrap();
	assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
	cancel.cancel();
}
