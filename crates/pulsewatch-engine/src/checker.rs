// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use async_trait::async_trait;
use pulsewatch_core::CheckJob;
use serde_json::Value;

/// What a checker implementation reports back to the engine, pre-timeout
/// and pre-normalization (§4.2 step 4). The engine fills in defaults for
/// an empty `status` and stamps `data.error` on failure (step 5).
#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
	pub status: String,
	pub latency_ms: i64,
	pub data: HashMap<String, Value>,
	pub error: Option<String>,
}

impl CheckOutcome {
	pub fn up(latency_ms: i64) -> Self {
		CheckOutcome {
			status: pulsewatch_core::STATUS_UP.to_string(),
			latency_ms,
			data: HashMap::new(),
			error: None,
		}
	}

	pub fn down(latency_ms: i64, error: impl Into<String>) -> Self {
		CheckOutcome {
			status: pulsewatch_core::STATUS_DOWN.to_string(),
			latency_ms,
			data: HashMap::new(),
			error: Some(error.into()),
		}
	}
}

/// A pluggable check method (§4.2), registered in the [`crate::CheckEngine`]
/// under a method name. Implementations should honour the cancellation of
/// the passed-in context by racing their I/O against it, the way
/// `tcp_check` races `TcpStream::connect` against the derived timeout.
#[async_trait]
pub trait Checker: Send + Sync {
	async fn check(&self, job: &CheckJob) -> CheckOutcome;
}
