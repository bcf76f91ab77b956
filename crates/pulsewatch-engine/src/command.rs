// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pulsewatch_core::CheckJob;
use serde_json::Value;
use tokio::process::Command;

use crate::checker::{CheckOutcome, Checker};

/// Registered from `checkers.yaml` entries with `type = "command"` (§4.2):
/// runs `"<cmd> <address>"` through the host shell and reports `UP` on exit
/// code 0, `DOWN` otherwise. `stdout`/`stderr` are captured into `data` for
/// both outcomes so operators can see why a shell-backed check failed.
#[derive(Debug, Clone)]
pub struct CommandChecker {
	command: String,
}

impl CommandChecker {
	pub fn new(command: impl Into<String>) -> Self {
		CommandChecker { command: command.into() }
	}
}

#[async_trait]
impl Checker for CommandChecker {
	async fn check(&self, job: &CheckJob) -> CheckOutcome {
		let timeout = Duration::from_secs(job.timeout_sec.max(1) as u64);
		let start = Instant::now();
		let full_command = format!("{} {}", self.command, job.address);

		let spawned = Command::new("sh")
			.arg("-c")
			.arg(&full_command)
			.output();

		let mut data = HashMap::new();
		data.insert("command".to_string(), Value::String(full_command));

		match tokio::time::timeout(timeout, spawned).await {
			Ok(Ok(output)) => {
				let latency_ms = start.elapsed().as_millis() as i64;
				data.insert(
					"stdout".to_string(),
					Value::String(String::from_utf8_lossy(&output.stdout).trim().to_string()),
				);
				data.insert(
					"stderr".to_string(),
					Value::String(String::from_utf8_lossy(&output.stderr).trim().to_string()),
				);

				if output.status.success() {
					CheckOutcome {
						status: pulsewatch_core::STATUS_UP.to_string(),
						latency_ms,
						data,
						error: None,
					}
				} else {
					let error = format!("command exited with {}", output.status);
					data.insert("error".to_string(), Value::String(error.clone()));
					CheckOutcome {
						status: pulsewatch_core::STATUS_DOWN.to_string(),
						latency_ms,
						data,
						error: Some(error),
					}
				}
			}
			Ok(Err(err)) => {
				let error = err.to_string();
				data.insert("error".to_string(), Value::String(error.clone()));
				CheckOutcome {
					status: pulsewatch_core::STATUS_DOWN.to_string(),
					latency_ms: start.elapsed().as_millis() as i64,
					data,
					error: Some(error),
				}
			}
			Err(_elapsed) => {
				let error = "command timed out".to_string();
				data.insert("error".to_string(), Value::String(error.clone()));
				CheckOutcome {
					status: pulsewatch_core::STATUS_DOWN.to_string(),
					latency_ms: start.elapsed().as_millis() as i64,
					data,
					error: Some(error),
				}
			}
		}
	}
}
