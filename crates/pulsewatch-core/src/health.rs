// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STATUS_UP: &str = "UP";
pub const STATUS_DOWN: &str = "DOWN";
pub const STATUS_UNKNOWN: &str = "UNKNOWN";
pub const STATUS_UNKNOWN_METHOD: &str = "UNKNOWN_METHOD";

/// The latest observed health of a device, as produced by a checker.
///
/// `status` is intentionally a free-form string rather than a closed enum:
/// checker implementations outside this crate (loaded from `checkers.yaml`)
/// may report statuses this crate has no knowledge of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
	pub device_id: String,
	pub status: String,
	pub latency_ms: i64,
	pub last_check: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub runner: String,
	#[serde(default, skip_serializing_if = "HashMap::is_empty")]
	pub data: HashMap<String, Value>,
}

/// The sentinel "zero instant" a `HealthStatus` carries before any check has
/// ever run — analogous to Go's zero `time.Time`. Bootstrap (§4.1) treats a
/// record at this instant the same as no record at all.
pub fn zero_time() -> DateTime<Utc> {
	DateTime::<Utc>::UNIX_EPOCH
}

impl HealthStatus {
	pub fn unknown_method(device_id: impl Into<String>, method: impl Into<String>) -> Self {
		let mut data = HashMap::new();
		data.insert("method".to_string(), Value::String(method.into()));
		HealthStatus {
			device_id: device_id.into(),
			status: STATUS_UNKNOWN_METHOD.to_string(),
			latency_ms: -1,
			last_check: Utc::now(),
			runner: String::new(),
			data,
		}
	}
}
