// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::{Duration, Instant};

use async_trait::async_trait;
use pulsewatch_core::CheckJob;
use tokio::net::TcpStream;

use crate::checker::{CheckOutcome, Checker};

/// Pre-registered under the method name `tcp_check` (§4.2): connects to
/// `job.address` and reports `UP` with the connect latency on success, or
/// `DOWN` with the elapsed time and the connection error otherwise.
#[derive(Debug, Default)]
pub struct TcpChecker;

#[async_trait]
impl Checker for TcpChecker {
	async fn check(&self, job: &CheckJob) -> CheckOutcome {
		let timeout = Duration::from_secs(job.timeout_sec.max(1) as u64);
		let start = Instant::now();

		match tokio::time::timeout(timeout, TcpStream::connect(&job.address)).await {
			Ok(Ok(_stream)) => CheckOutcome::up(start.elapsed().as_millis() as i64),
			Ok(Err(err)) => CheckOutcome::down(start.elapsed().as_millis() as i64, err.to_string()),
			Err(_elapsed) => CheckOutcome::down(start.elapsed().as_millis() as i64, "connect timed out"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tokio::net::TcpListener;

	fn job(address: &str) -> CheckJob {
		CheckJob {
			device_id: "dev-1".to_string(),
			address: address.to_string(),
			method: "tcp_check".to_string(),
			interval_sec: 30,
			timeout_sec: 2,
			next_run: chrono::Utc::now(),
		}
	}

	#[tokio::test]
	async fn connects_successfully_to_a_listening_port() {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move {
			let _ = listener.accept().await;
		});

		let outcome = TcpChecker.check(&job(&addr.to_string())).await;
		assert_eq!(outcome.status, pulsewatch_core::STATUS_UP);
		assert!(outcome.error.is_none());
	}

	#[tokio::test]
	async fn reports_down_when_nothing_is_listening() {
		// Port 0 never accepts connections; picking an ephemeral port that
		// we immediately drop the listener for gives us a closed port.
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		drop(listener);

		let outcome = TcpChecker.check(&job(&addr.to_string())).await;
		assert_eq!(outcome.status, pulsewatch_core::STATUS_DOWN);
		assert!(outcome.error.is_some());
	}
}
