// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use pulsewatch_core::{CheckJob, CheckerConfig, HealthStatus};
use serde_json::Value;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::checker::{CheckOutcome, Checker};
use crate::command::CommandChecker;
use crate::tcp::TcpChecker;

/// Fallback timeout (§3, CheckJob invariant) applied when a job's
/// `timeout_sec` is non-positive.
const DEFAULT_TIMEOUT_SEC: i64 = 5;

/// A thread-safe registry mapping method name to [`Checker`] (§4.2),
/// plus the logic to run a job against its registered checker with a
/// timeout and produce a normalized [`HealthStatus`].
///
/// Stateless beyond the registry: `Arc<CheckEngine>` is shared immutably
/// among workers and HTTP handlers alike.
pub struct CheckEngine {
	checkers: RwLock<HashMap<String, Arc<dyn Checker>>>,
}

impl Default for CheckEngine {
	fn default() -> Self {
		Self::new()
	}
}

impl CheckEngine {
	/// Builds an engine with the built-in `tcp_check` checker pre-registered
	/// (§4.2).
	pub fn new() -> Self {
		let mut checkers: HashMap<String, Arc<dyn Checker>> = HashMap::new();
		checkers.insert("tcp_check".to_string(), Arc::new(TcpChecker));
		CheckEngine {
			checkers: RwLock::new(checkers),
		}
	}

	/// Registers (or replaces) the checker for `method`.
	pub async fn register(&self, method: impl Into<String>, checker: Arc<dyn Checker>) {
		self.checkers.write().await.insert(method.into(), checker);
	}

	/// Registers a `command`-typed checker for every entry in `config`
	/// (§6.5); entries of any other `type` are skipped — the loader is
	/// tolerant of checker types this implementation does not realize.
	#[tracing::instrument(skip(self, config))]
	pub async fn load_config(&self, config: &CheckerConfig) {
		for (name, entry) in &config.checkers {
			if entry.kind != "command" {
				tracing::debug!(method = %name, kind = %entry.kind, "skipping unrecognized checker type");
				continue;
			}
			tracing::info!(method = %name, command = %entry.command, "registering command checker");
			self.register(name.clone(), Arc::new(CommandChecker::new(entry.command.clone()))).await;
		}
	}

	/// Runs `job` against its registered checker under a timeout, honouring
	/// `cancel` for early abort, and returns a normalized [`HealthStatus`]
	/// (§4.2 `Handle`). Returns `None` when the job carries no device id —
	/// the caller logs and moves on, mirroring the source's `nil` return.
	#[tracing::instrument(skip(self, cancel), fields(device_id = %job.device_id, method = %job.method))]
	pub async fn handle(&self, job: &CheckJob, cancel: &CancellationToken) -> Option<HealthStatus> {
		if job.device_id.is_empty() {
			return None;
		}

		let checker = self.checkers.read().await.get(&job.method).cloned();
		let Some(checker) = checker else {
			return Some(HealthStatus::unknown_method(job.device_id.clone(), job.method.clone()));
		};

		let effective_timeout_sec = if job.timeout_sec > 0 { job.timeout_sec } else { DEFAULT_TIMEOUT_SEC };
		let mut bounded_job = job.clone();
		bounded_job.timeout_sec = effective_timeout_sec;
		let timeout = Duration::from_secs(effective_timeout_sec as u64);

		let start = Instant::now();
		let outcome = tokio::select! {
			result = tokio::time::timeout(timeout, checker.check(&bounded_job)) => {
				result.unwrap_or_else(|_elapsed| {
					CheckOutcome::down(start.elapsed().as_millis() as i64, "checker timed out")
				})
			}
			_ = cancel.cancelled() => {
				CheckOutcome::down(start.elapsed().as_millis() as i64, "cancelled")
			}
		};

		Some(normalize(job.device_id.clone(), outcome))
	}
}

/// Step 5 of §4.2 `Handle`: empty status becomes `DOWN` on error, else
/// `UNKNOWN`; `data.error` is stamped whenever an error accompanied the
/// outcome.
fn normalize(device_id: String, mut outcome: CheckOutcome) -> HealthStatus {
	if outcome.status.is_empty() {
		outcome.status = if outcome.error.is_some() {
			pulsewatch_core::STATUS_DOWN.to_string()
		} else {
			pulsewatch_core::STATUS_UNKNOWN.to_string()
		};
	}
	if let Some(error) = &outcome.error {
		outcome
			.data
			.entry("error".to_string())
			.or_insert_with(|| Value::String(error.clone()));
	}

	HealthStatus {
		device_id,
		status: outcome.status,
		latency_ms: outcome.latency_ms,
		last_check: Utc::now(),
		runner: String::new(),
		data: outcome.data,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn job(device_id: &str, method: &str) -> CheckJob {
		CheckJob {
			device_id: device_id.to_string(),
			address: "127.0.0.1:1".to_string(),
			method: method.to_string(),
			interval_sec: 30,
			timeout_sec: 1,
			next_run: Utc::now(),
		}
	}

	#[tokio::test]
	async fn empty_device_id_returns_none() {
		let engine = CheckEngine::new();
		let result = engine.handle(&job("", "tcp_check"), &CancellationToken::new()).await;
		assert!(result.is_none());
	}

	#[tokio::test]
	async fn unregistered_method_returns_unknown_method() {
		let engine = CheckEngine::new();
		let result = engine
			.handle(&job("dev-1", "does_not_exist"), &CancellationToken::new())
			.await
			.unwrap();
		assert_eq!(result.status, pulsewatch_core::STATUS_UNKNOWN_METHOD);
		assert_eq!(result.latency_ms, -1);
	}

	#[tokio::test]
	async fn cancellation_surfaces_as_down() {
		let engine = CheckEngine::new();
		let cancel = CancellationToken::new();
		cancel.cancel();
		let result = engine.handle(&job("dev-1", "tcp_check"), &cancel).await.unwrap();
		assert_eq!(result.status, pulsewatch_core::STATUS_DOWN);
	}

	#[tokio::test]
	async fn non_positive_timeout_falls_back_to_default() {
		let engine = CheckEngine::new();
		let mut j = job("dev-1", "tcp_check");
		j.timeout_sec = 0;
		// Not asserting timing here, just that handling doesn't panic and
		// produces a result within the 5s fallback window.
		let result = tokio::time::timeout(Duration::from_secs(6), engine.handle(&j, &CancellationToken::new()))
			.await
			.expect("handle should resolve within the fallback timeout");
		assert!(result.is_some());
	}

	#[tokio::test]
	async fn load_config_registers_command_checkers_and_skips_unknown_types() {
		let engine = CheckEngine::new();
		let mut config = CheckerConfig::default();
		config.checkers.insert(
			"cmd_ping".to_string(),
			pulsewatch_core::CheckerEntry {
				kind: "command".to_string(),
				command: "true".to_string(),
				method: None,
				path: None,
				timeout_sec: None,
			},
		);
		config.checkers.insert(
			"mystery".to_string(),
			pulsewatch_core::CheckerEntry {
				kind: "unsupported".to_string(),
				command: String::new(),
				method: None,
				path: None,
				timeout_sec: None,
			},
		);
		engine.load_config(&config).await;

		let result = engine.handle(&job("dev-1", "cmd_ping"), &CancellationToken::new()).await.unwrap();
		assert_eq!(result.status, pulsewatch_core::STATUS_UP);

		let result = engine.handle(&job("dev-1", "mystery"), &CancellationToken::new()).await.unwrap();
		assert_eq!(result.status, pulsewatch_core::STATUS_UNKNOWN_METHOD);
	}
}
