// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The HTTP remote worker loop (§4.4): polls a Pulsewatch server for due
//! jobs, runs them through the [`CheckEngine`], and reports the outcome
//! back over HTTP. Never touches the scheduler directly — the server is
//! the single source of truth.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use pulsewatch_core::CheckJob;
use pulsewatch_dispatch::{hmac_sig, PollRequest, PollResponse, ReportRequest, POLL_PATH, REPORT_PATH};
use pulsewatch_engine::CheckEngine;
use reqwest::{Client, StatusCode};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::worker::Worker;

pub struct RemoteWorker {
	worker_id: String,
	worker_key: Option<String>,
	server_url: String,
	engine: std::sync::Arc<CheckEngine>,
	client: Client,
	/// Poll/sleep cadence when there is no due job, or a transport error
	/// occurred (§4.4 "sleep 1s").
	idle_sleep: Duration,
}

impl RemoteWorker {
	pub fn new(worker_id: impl Into<String>, worker_key: Option<String>, server_url: impl Into<String>, engine: std::sync::Arc<CheckEngine>, idle_sleep: Duration) -> Self {
		RemoteWorker {
			worker_id: worker_id.into(),
			worker_key,
			server_url: server_url.into().trim_end_matches('/').to_string(),
			engine,
			client: Client::builder().timeout(Duration::from_secs(30)).build().expect("reqwest client builds with static config"),
			idle_sleep,
		}
	}

	fn sign(&self, request: reqwest::RequestBuilder, path: &str, body: &[u8]) -> reqwest::RequestBuilder {
		let Some(key) = &self.worker_key else {
			return request;
		};
		let timestamp = Utc::now().timestamp();
		let signature = hmac_sig::sign(key.as_bytes(), timestamp, &self.worker_id, "POST", path, body);
		request
			.header("X-Worker-Id", &self.worker_id)
			.header("X-Worker-Timestamp", timestamp.to_string())
			.header("X-Worker-Signature", signature)
	}

	#[tracing::instrument(skip(self), fields(worker_id = %self.worker_id))]
	async fn poll(&self) -> Option<CheckJob> {
		let body = serde_json::to_vec(&PollRequest {
			worker_id: self.worker_id.clone(),
		})
		.expect("PollRequest always serializes");

		let url = format!("{}{}", self.server_url, POLL_PATH);
		let request = self.client.post(&url).header("content-type", "application/json");
		let request = self.sign(request, POLL_PATH, &body);

		let response = match request.body(body).send().await {
			Ok(response) => response,
			Err(err) => {
				tracing::warn!(error = %err, "poll request failed");
				return None;
			}
		};

		match response.status() {
			StatusCode::OK => match response.json::<PollResponse>().await {
				Ok(job) => Some(CheckJob {
					device_id: job.device_id,
					address: job.address,
					method: job.method,
					interval_sec: job.interval_sec,
					timeout_sec: job.timeout_sec,
					next_run: Utc::now(),
				}),
				Err(err) => {
					tracing::warn!(error = %err, "failed to decode poll response");
					None
				}
			},
			StatusCode::NO_CONTENT => None,
			other => {
				tracing::warn!(status = %other, "poll returned an unexpected status");
				None
			}
		}
	}

	#[tracing::instrument(skip(self, status), fields(worker_id = %self.worker_id, device_id = %status.device_id))]
	async fn report(&self, status: &pulsewatch_core::HealthStatus) {
		let report_body = ReportRequest {
			worker_id: self.worker_id.clone(),
			job_id: None,
			device_id: status.device_id.clone(),
			status: status.status.clone(),
			latency_ms: status.latency_ms,
			last_check: Some(status.last_check),
		};
		let body = serde_json::to_vec(&report_body).expect("ReportRequest always serializes");

		let url = format!("{}{}", self.server_url, REPORT_PATH);
		let request = self.client.post(&url).header("content-type", "application/json");
		let request = self.sign(request, REPORT_PATH, &body);

		match request.body(body).send().await {
			Ok(response) if response.status().as_u16() < 300 => {}
			Ok(response) => tracing::warn!(status = %response.status(), "report rejected by server"),
			Err(err) => tracing::warn!(error = %err, "report request failed"),
		}
	}
}

#[async_trait]
impl Worker for RemoteWorker {
	async fn run(&self, cancel: CancellationToken) -> Result<()> {
		loop {
			if cancel.is_cancelled() {
				return Ok(());
			}

			let Some(job) = self.poll().await else {
				tokio::select! {
					_ = tokio::time::sleep(self.idle_sleep) => continue,
					_ = cancel.cancelled() => return Ok(()),
				}
			};

			let Some(mut status) = self.engine.handle(&job, &cancel).await else {
				tracing::warn!(device_id = %job.device_id, "engine produced no result for job");
				continue;
			};
			if status.runner.is_empty() {
				status.runner = self.worker_id.clone();
			}

			self.report(&status).await;
		}
	}
}
