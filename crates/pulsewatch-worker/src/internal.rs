// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The in-process worker loop (§4.3): pulls jobs straight from the
//! [`Scheduler`], runs them through the [`CheckEngine`], and saves the
//! result to the [`HealthRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use pulsewatch_core::HealthRepository;
use pulsewatch_engine::CheckEngine;
use pulsewatch_scheduler::{Scheduler, SchedulerError};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, WorkerError};
use crate::worker::Worker;

/// Fallback TTL basis (§3) applied when a job's `timeout_sec` is
/// non-positive, mirroring the engine's own fallback.
const DEFAULT_TIMEOUT_SEC: i64 = 5;

pub struct InternalWorker {
	id: String,
	scheduler: Arc<Scheduler>,
	engine: Arc<CheckEngine>,
	health: Arc<dyn HealthRepository>,
}

impl InternalWorker {
	pub fn new(id: impl Into<String>, scheduler: Arc<Scheduler>, engine: Arc<CheckEngine>, health: Arc<dyn HealthRepository>) -> Self {
		InternalWorker {
			id: id.into(),
			scheduler,
			engine,
			health,
		}
	}
}

#[async_trait]
impl Worker for InternalWorker {
	#[tracing::instrument(skip(self, cancel), fields(worker_id = %self.id))]
	async fn run(&self, cancel: CancellationToken) -> Result<()> {
		loop {
			let job = match self.scheduler.next_job(&cancel).await {
				Ok(job) => job,
				Err(SchedulerError::Closed) => {
					tracing::info!("scheduler closed, exiting");
					return Ok(());
				}
				Err(SchedulerError::Cancelled) => return Err(WorkerError::Cancelled),
				Err(other) => {
					tracing::warn!(error = %other, "scheduler error fetching next job");
					continue;
				}
			};

			let Some(mut status) = self.engine.handle(&job, &cancel).await else {
				tracing::warn!(device_id = %job.device_id, "engine produced no result for job");
				continue;
			};
			status.runner = self.id.clone();

			let effective_timeout = if job.timeout_sec > 0 { job.timeout_sec } else { DEFAULT_TIMEOUT_SEC };
			if let Err(err) = self.health.save(status, 3 * effective_timeout).await {
				tracing::warn!(device_id = %job.device_id, error = %err, "failed to save health status");
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pulsewatch_core::{Device, DeviceRepository, HealthStatus};
	use std::collections::HashMap;
	use std::sync::Mutex;
	use std::time::Duration;

	struct FakeDevices(Vec<Device>);

	#[async_trait]
	impl DeviceRepository for FakeDevices {
		async fn list(&self) -> pulsewatch_core::Result<Vec<Device>> {
			Ok(self.0.clone())
		}
		async fn get_by_id(&self, id: &str) -> pulsewatch_core::Result<Option<Device>> {
			Ok(self.0.iter().find(|d| d.id == id).cloned())
		}
		async fn save(&self, device: Device) -> pulsewatch_core::Result<Device> {
			Ok(device)
		}
		async fn delete_by_id(&self, _id: &str) -> pulsewatch_core::Result<()> {
			Ok(())
		}
	}

	#[derive(Default)]
	struct FakeHealth(Mutex<HashMap<String, HealthStatus>>);

	#[async_trait]
	impl HealthRepository for FakeHealth {
		async fn get(&self, device_id: &str) -> pulsewatch_core::Result<Option<HealthStatus>> {
			Ok(self.0.lock().unwrap().get(device_id).cloned())
		}
		async fn save(&self, status: HealthStatus, _ttl_sec: i64) -> pulsewatch_core::Result<()> {
			self.0.lock().unwrap().insert(status.device_id.clone(), status);
			Ok(())
		}
		async fn delete(&self, device_id: &str) -> pulsewatch_core::Result<()> {
			self.0.lock().unwrap().remove(device_id);
			Ok(())
		}
	}

	fn device(id: &str) -> Device {
		Device {
			id: id.to_string(),
			address: "127.0.0.1:9".to_string(),
			name: "127.0.0.1:9".to_string(),
			check_method: "tcp_check".to_string(),
			interval_sec: 3600,
		}
	}

	#[tokio::test]
	async fn runs_a_job_and_saves_stamped_health() {
		let scheduler = Arc::new(Scheduler::new());
		let devices = FakeDevices(vec![device("dev-1")]);
		scheduler.bootstrap(&devices, &FakeHealth::default()).await.unwrap();

		let health = Arc::new(FakeHealth::default());
		let engine = Arc::new(CheckEngine::new());
		let worker = InternalWorker::new("worker-1", scheduler.clone(), engine, health.clone());

		let cancel = CancellationToken::new();
		let worker_cancel = cancel.clone();
		let handle = tokio::spawn(async move { worker.run(worker_cancel).await });

		tokio::time::sleep(Duration::from_millis(100)).await;
		cancel.cancel();
		let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;

		let saved = health.0.lock().unwrap().get("dev-1").cloned().expect("a status should have been saved");
		assert_eq!(saved.runner, "worker-1");
	}

	#[tokio::test]
	async fn exits_cleanly_when_scheduler_closes() {
		let scheduler = Arc::new(Scheduler::new());
		let health = Arc::new(FakeHealth::default());
		let engine = Arc::new(CheckEngine::new());
		let worker = InternalWorker::new("worker-1", scheduler.clone(), engine, health);

		scheduler.close();
		let result = worker.run(CancellationToken::new()).await;
		assert!(result.is_ok());
	}
}
