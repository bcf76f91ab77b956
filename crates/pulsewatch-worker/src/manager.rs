// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Supervises N worker instances with bounded restart backoff (§4.5),
//! grounded in this codebase's job-retry backoff (see `loom-server-jobs`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::worker::Worker;

const RETRY_FACTOR: f64 = 2.0;

/// Supervises `count` worker instances, each constructed fresh from
/// `factory` on every (re)start. `Start` is idempotent; `Stop` cancels
/// every loop and awaits them all.
pub struct WorkerManager {
	count: usize,
	factory: Arc<dyn Fn(usize) -> Arc<dyn Worker> + Send + Sync>,
	base_backoff_sec: u64,
	max_backoff_sec: u64,
	cancel: CancellationToken,
	started: AtomicBool,
	handles: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerManager {
	/// `base_backoff_sec`/`max_backoff_sec` bound the exponential restart
	/// delay (§4.5); a caller with no opinion should use 1 and 60, mirroring
	/// this codebase's own job-retry backoff.
	pub fn new(count: usize, base_backoff_sec: u64, max_backoff_sec: u64, factory: impl Fn(usize) -> Arc<dyn Worker> + Send + Sync + 'static) -> Self {
		WorkerManager {
			count,
			factory: Arc::new(factory),
			base_backoff_sec: base_backoff_sec.max(1),
			max_backoff_sec: max_backoff_sec.max(1),
			cancel: CancellationToken::new(),
			started: AtomicBool::new(false),
			handles: Mutex::new(Vec::new()),
		}
	}

	/// Spawns a supervision loop per worker slot. A second call is a no-op.
	pub fn start(&self) {
		if self.started.swap(true, Ordering::SeqCst) {
			return;
		}

		let mut handles = self.handles.lock().expect("worker manager mutex poisoned");
		for id in 0..self.count {
			let factory = Arc::clone(&self.factory);
			let cancel = self.cancel.clone();
			let base = self.base_backoff_sec;
			let max = self.max_backoff_sec;
			handles.push(tokio::spawn(async move {
				supervise(id, factory, cancel, base, max).await;
			}));
		}
		tracing::info!(worker_count = self.count, "worker manager started");
	}

	/// Cancels every supervised loop and waits for them to finish.
	pub async fn stop(&self) {
		self.cancel.cancel();
		let handles = {
			let mut handles = self.handles.lock().expect("worker manager mutex poisoned");
			std::mem::take(&mut *handles)
		};
		for handle in handles {
			let _ = handle.await;
		}
		tracing::info!("worker manager stopped");
	}
}

async fn supervise(id: usize, factory: Arc<dyn Fn(usize) -> Arc<dyn Worker> + Send + Sync>, cancel: CancellationToken, base_backoff_sec: u64, max_backoff_sec: u64) {
	let mut retry_count = 0u32;

	loop {
		if cancel.is_cancelled() {
			return;
		}

		let worker = factory(id);
		match worker.run(cancel.clone()).await {
			Ok(()) => return,
			Err(WorkerError::Cancelled) => return,
			Err(err) => {
				retry_count += 1;
				let delay = backoff_delay(retry_count, base_backoff_sec, max_backoff_sec);
				tracing::warn!(worker_slot = id, error = %err, delay_secs = delay, "worker exited unexpectedly, restarting");
				tokio::select! {
					_ = tokio::time::sleep(Duration::from_secs(delay)) => {}
					_ = cancel.cancelled() => return,
				}
			}
		}
	}
}

fn backoff_delay(retry_count: u32, base_backoff_sec: u64, max_backoff_sec: u64) -> u64 {
	let delay = base_backoff_sec as f64 * RETRY_FACTOR.powi(retry_count as i32 - 1);
	(delay as u64).min(max_backoff_sec)
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::atomic::AtomicUsize;
	use std::time::Duration as StdDuration;

	struct CountingWorker {
		runs: Arc<AtomicUsize>,
	}

	#[async_trait]
	impl Worker for CountingWorker {
		async fn run(&self, cancel: CancellationToken) -> crate::error::Result<()> {
			self.runs.fetch_add(1, Ordering::SeqCst);
			cancel.cancelled().await;
			Ok(())
		}
	}

	#[test]
	fn backoff_delay_follows_exponential_schedule() {
		assert_eq!(backoff_delay(1, 1, 60), 1);
		assert_eq!(backoff_delay(2, 1, 60), 2);
		assert_eq!(backoff_delay(3, 1, 60), 4);
		assert_eq!(backoff_delay(10, 1, 60), 60);
	}

	#[tokio::test]
	async fn start_spawns_exactly_count_workers() {
		let runs = Arc::new(AtomicUsize::new(0));
		let manager = Arc::new(WorkerManager::new(3, 1, 60, {
			let runs = runs.clone();
			move |_id| Arc::new(CountingWorker { runs: runs.clone() }) as Arc<dyn Worker>
		}));

		manager.start();
		tokio::time::sleep(StdDuration::from_millis(50)).await;
		manager.stop().await;

		assert_eq!(runs.load(Ordering::SeqCst), 3);
	}

	#[tokio::test]
	async fn start_is_idempotent() {
		let runs = Arc::new(AtomicUsize::new(0));
		let manager = Arc::new(WorkerManager::new(2, 1, 60, {
			let runs = runs.clone();
			move |_id| Arc::new(CountingWorker { runs: runs.clone() }) as Arc<dyn Worker>
		}));

		manager.start();
		manager.start();
		tokio::time::sleep(StdDuration::from_millis(50)).await;
		manager.stop().await;

		assert_eq!(runs.load(Ordering::SeqCst), 2);
	}

	struct FlakyWorker {
		attempts: Arc<AtomicUsize>,
	}

	#[async_trait]
	impl Worker for FlakyWorker {
		async fn run(&self, _cancel: CancellationToken) -> crate::error::Result<()> {
			let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
			if attempt < 2 {
				Err(WorkerError::Failed("synthetic failure".to_string()))
			} else {
				Ok(())
			}
		}
	}

	#[tokio::test]
	async fn restarts_on_error_until_clean_exit() {
		let attempts = Arc::new(AtomicUsize::new(0));
		let manager = Arc::new(WorkerManager::new(1, 1, 60, {
			let attempts = attempts.clone();
			move |_id| Arc::new(FlakyWorker { attempts: attempts.clone() }) as Arc<dyn Worker>
		}));

		manager.start();
		tokio::time::timeout(StdDuration::from_secs(5), async {
			while attempts.load(Ordering::SeqCst) < 3 {
				tokio::time::sleep(StdDuration::from_millis(20)).await;
			}
		})
		.await
		.expect("worker should have been restarted to a clean exit");
		manager.stop().await;

		assert_eq!(attempts.load(Ordering::SeqCst), 3);
	}
}
