// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types for the dispatch poll/report protocol (§6.3).

use chrono::{DateTime, Utc};
use pulsewatch_core::CheckJob;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollRequest {
	pub worker_id: String,
}

/// §6.3: "field names lower_snake_case" — `CheckJob` already serializes
/// this way, but the wire contract intentionally excludes `next_run`
/// (scheduler-internal bookkeeping the remote worker has no use for), so
/// this is kept as its own narrower type rather than reusing `CheckJob`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollResponse {
	pub device_id: String,
	pub address: String,
	pub method: String,
	pub interval_sec: i64,
	pub timeout_sec: i64,
}

impl From<&CheckJob> for PollResponse {
	fn from(job: &CheckJob) -> Self {
		PollResponse {
			device_id: job.device_id.clone(),
			address: job.address.clone(),
			method: job.method.clone(),
			interval_sec: job.interval_sec,
			timeout_sec: job.timeout_sec,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
	pub worker_id: String,
	#[serde(default)]
	pub job_id: Option<String>,
	pub device_id: String,
	pub status: String,
	#[serde(default = "default_latency")]
	pub latency_ms: i64,
	#[serde(default)]
	pub last_check: Option<DateTime<Utc>>,
}

fn default_latency() -> i64 {
	-1
}
