// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduler-internal, ephemeral representation of a pending check.
///
/// Jobs are rederived from [`crate::Device`] state; nothing about a job is
/// durable beyond the scheduler's in-memory queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckJob {
	pub device_id: String,
	pub address: String,
	pub method: String,
	pub interval_sec: i64,
	pub timeout_sec: i64,
	/// The instant at which this job became (or will become) eligible to run.
	#[serde(default = "Utc::now")]
	pub next_run: DateTime<Utc>,
}

impl CheckJob {
	pub fn from_device(device: &crate::Device, next_run: DateTime<Utc>) -> Self {
		CheckJob {
			device_id: device.id.clone(),
			address: device.address.clone(),
			method: device.check_method.clone(),
			interval_sec: device.interval_sec,
			timeout_sec: device.interval_sec,
			next_run,
		}
	}

	pub fn interval(&self) -> chrono::Duration {
		chrono::Duration::seconds(self.interval_sec.max(1))
	}
}
