// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use pulsewatch_core::{CheckJob, DeviceRepository, HealthRepository};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, SchedulerError};

/// Upper bound on how long `next_job` ever sleeps in one iteration. Guards
/// against a missed `Notify::notify_waiters` wakeup (it carries no permit,
/// unlike `notify_one`) the same way the internal and remote worker loops
/// fall back to a 1s poll elsewhere in this system.
const MAX_WAIT: StdDuration = StdDuration::from_secs(1);

struct Entry {
	job: CheckJob,
	seq: u64,
}

struct Inner {
	/// Canonical per-device job state. Exactly one entry per device_id.
	entries: HashMap<String, Entry>,
	/// `(next_run, seq) -> device_id`, ordered so `iter().next()` is the
	/// earliest-due job; `seq` breaks ties between equal `next_run` values
	/// deterministically (earlier `Add`/reschedule wins).
	order: BTreeMap<(DateTime<Utc>, u64), String>,
	next_seq: u64,
	closed: bool,
}

impl Inner {
	fn new() -> Self {
		Inner {
			entries: HashMap::new(),
			order: BTreeMap::new(),
			next_seq: 0,
			closed: false,
		}
	}

	fn insert(&mut self, job: CheckJob) {
		if let Some(existing) = self.entries.remove(&job.device_id) {
			self.order.remove(&(existing.job.next_run, existing.seq));
		}
		let seq = self.next_seq;
		self.next_seq += 1;
		self.order.insert((job.next_run, seq), job.device_id.clone());
		self.entries.insert(job.device_id.clone(), Entry { job, seq });
	}

	/// Pops the earliest job if it is due, rescheduling it in the same
	/// motion. Returns the popped job stamped with its *original* (pre-
	/// reschedule) `next_run`, per the scheduler's NextJob contract.
	fn pop_due(&mut self, now: DateTime<Utc>) -> Option<CheckJob> {
		let (&key, device_id) = self.order.iter().next().map(|(k, v)| (k, v.clone()))?;
		if key.0 > now {
			return None;
		}
		self.order.remove(&key);
		let entry = self.entries.remove(device_id.as_str())?;
		let mut rescheduled = entry.job.clone();
		let original_next_run = rescheduled.next_run;
		let advanced = (rescheduled.next_run + rescheduled.interval()).max(now + rescheduled.interval());
		rescheduled.next_run = advanced;
		self.insert(rescheduled);

		let mut returned = entry.job;
		returned.next_run = original_next_run;
		Some(returned)
	}

	/// Duration until the earliest entry becomes due, capped at `MAX_WAIT`.
	fn wait_duration(&self, now: DateTime<Utc>) -> StdDuration {
		match self.order.keys().next() {
			None => MAX_WAIT,
			Some((next_run, _)) => {
				let remaining = (*next_run - now).to_std().unwrap_or(StdDuration::ZERO);
				remaining.min(MAX_WAIT)
			}
		}
	}
}

/// Time-ordered job scheduler (§4.1). Tracks exactly one pending job per
/// device and serves them to workers in due-time order, blocking callers
/// until a job becomes due.
pub struct Scheduler {
	inner: Mutex<Inner>,
	notify: Notify,
}

impl Default for Scheduler {
	fn default() -> Self {
		Self::new()
	}
}

impl Scheduler {
	pub fn new() -> Self {
		Scheduler {
			inner: Mutex::new(Inner::new()),
			notify: Notify::new(),
		}
	}

	/// Seeds the queue from durable state: every known device gets exactly
	/// one job, due either immediately (never checked, or its last check is
	/// overdue — catch-up) or at `last_check + interval` (still current).
	#[tracing::instrument(skip(self, devices, health))]
	pub async fn bootstrap(
		&self,
		devices: &dyn DeviceRepository,
		health: &dyn HealthRepository,
	) -> Result<()> {
		let now = Utc::now();
		for device in devices.list().await? {
			let last_check = match health.get(&device.id).await {
				Ok(Some(status)) => Some(status.last_check),
				Ok(None) => None,
				Err(err) => {
					tracing::warn!(device_id = %device.id, error = %err, "treating health lookup failure as no prior record");
					None
				}
			};

			let next_run = match last_check {
				None => now,
				Some(last_check) if last_check == pulsewatch_core::zero_time() => now,
				Some(last_check) => {
					let scheduled = last_check + chrono::Duration::seconds(device.interval_sec.max(1));
					if scheduled < now {
						now
					} else {
						scheduled
					}
				}
			};

			let job = CheckJob::from_device(&device, next_run);
			self.inner.lock().expect("scheduler mutex poisoned").insert(job);
		}
		self.notify.notify_waiters();
		Ok(())
	}

	/// Inserts or replaces the pending job for a device, due immediately.
	/// Realizes "exactly one job per device" by displacing any existing
	/// entry for the same `device_id`. A no-op once the scheduler is closed
	/// (§4.1 "Closed" state): a job enqueued after `close()` would never be
	/// served, since `next_job`/`try_next_job` both refuse to pop while
	/// closed.
	pub fn add(&self, job: CheckJob) {
		let mut job = job;
		job.next_run = Utc::now();
		let mut inner = self.inner.lock().expect("scheduler mutex poisoned");
		if inner.closed {
			return;
		}
		inner.insert(job);
		drop(inner);
		self.notify.notify_waiters();
	}

	/// Returns the next due job, blocking until one is available, the
	/// scheduler is closed, or `cancel` fires.
	pub async fn next_job(&self, cancel: &CancellationToken) -> Result<CheckJob> {
		loop {
			let now = Utc::now();
			let (popped, closed, wait) = {
				let mut inner = self.inner.lock().expect("scheduler mutex poisoned");
				if inner.closed {
					(None, true, StdDuration::ZERO)
				} else {
					let popped = inner.pop_due(now);
					let wait = inner.wait_duration(now);
					(popped, false, wait)
				}
			};

			if closed {
				return Err(SchedulerError::Closed);
			}
			if let Some(job) = popped {
				return Ok(job);
			}

			tokio::select! {
				_ = tokio::time::sleep(wait) => {}
				_ = self.notify.notified() => {}
				_ = cancel.cancelled() => return Err(SchedulerError::Cancelled),
			}
		}
	}

	/// Non-blocking variant of [`Scheduler::next_job`]: returns `Ok(None)`
	/// immediately if nothing is due yet, rather than waiting.
	pub fn try_next_job(&self) -> Result<Option<CheckJob>> {
		let mut inner = self.inner.lock().expect("scheduler mutex poisoned");
		if inner.closed {
			return Err(SchedulerError::Closed);
		}
		Ok(inner.pop_due(Utc::now()))
	}

	/// Drops a device's pending job, if any. Used when a device is deleted so
	/// the scheduler stops producing checks for it instead of running
	/// forever against a snapshot of an address that no longer has a device
	/// record behind it.
	pub fn remove(&self, device_id: &str) {
		let mut inner = self.inner.lock().expect("scheduler mutex poisoned");
		if let Some(entry) = inner.entries.remove(device_id) {
			inner.order.remove(&(entry.job.next_run, entry.seq));
		}
	}

	/// Marks the scheduler closed and wakes every blocked `next_job` caller
	/// so they observe the closed state promptly instead of waiting out
	/// their current sleep window.
	pub fn close(&self) {
		self.inner.lock().expect("scheduler mutex poisoned").closed = true;
		self.notify.notify_waiters();
	}

	pub fn is_closed(&self) -> bool {
		self.inner.lock().expect("scheduler mutex poisoned").closed
	}

	pub fn len(&self) -> usize {
		self.inner.lock().expect("scheduler mutex poisoned").entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Inserts a job preserving its exact `next_run`, bypassing `add`'s
	/// "due immediately" normalization. Only meaningful for exercising
	/// queue-ordering behavior directly in tests.
	#[cfg(test)]
	fn insert_raw(&self, job: CheckJob) {
		self.inner.lock().expect("scheduler mutex poisoned").insert(job);
		self.notify.notify_waiters();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use pulsewatch_core::{Device, HealthStatus};
	use std::sync::Arc;
	use std::time::Duration as StdDuration;

	fn job(device_id: &str, next_run: DateTime<Utc>) -> CheckJob {
		CheckJob {
			device_id: device_id.to_string(),
			address: "127.0.0.1:9".to_string(),
			method: "tcp_check".to_string(),
			interval_sec: 30,
			timeout_sec: 5,
			next_run,
		}
	}

	#[tokio::test]
	async fn add_replaces_existing_job_for_device() {
		let sched = Scheduler::new();
		sched.add(job("dev-1", Utc::now()));
		sched.add(job("dev-1", Utc::now()));
		assert_eq!(sched.len(), 1);
	}

	#[tokio::test]
	async fn next_job_blocks_until_due() {
		let sched = Arc::new(Scheduler::new());
		let due = Utc::now() + chrono::Duration::milliseconds(50);
		sched.insert_raw(job("dev-1", due));

		let cancel = CancellationToken::new();
		let got = tokio::time::timeout(StdDuration::from_secs(2), sched.next_job(&cancel))
			.await
			.expect("did not unblock in time")
			.expect("scheduler error");
		assert_eq!(got.device_id, "dev-1");
	}

	#[tokio::test]
	async fn next_job_never_returns_future_dated_job() {
		let sched = Scheduler::new();
		sched.insert_raw(job("dev-1", Utc::now() + chrono::Duration::hours(1)));
		assert!(sched.try_next_job().unwrap().is_none());
	}

	#[tokio::test]
	async fn popped_job_keeps_its_original_next_run_but_reschedules_forward() {
		let sched = Scheduler::new();
		let original = Utc::now() - chrono::Duration::seconds(1);
		sched.insert_raw(job("dev-1", original));

		let returned = sched.try_next_job().unwrap().expect("job should be due");
		// NextJob's contract: the caller sees the pre-reschedule next_run...
		assert_eq!(returned.next_run, original);
		// ...while the queue's own bookkeeping has already moved on, so the
		// same device isn't immediately due again.
		assert!(sched.try_next_job().unwrap().is_none());
	}

	#[tokio::test]
	async fn remove_drops_pending_job_for_device() {
		let sched = Scheduler::new();
		sched.add(job("dev-1", Utc::now()));
		sched.remove("dev-1");
		assert!(sched.is_empty());
		assert!(sched.try_next_job().unwrap().is_none());
	}

	#[tokio::test]
	async fn remove_of_unknown_device_is_a_no_op() {
		let sched = Scheduler::new();
		sched.add(job("dev-1", Utc::now()));
		sched.remove("dev-2");
		assert_eq!(sched.len(), 1);
	}

	#[tokio::test]
	async fn close_wakes_blocked_waiters() {
		let sched = Arc::new(Scheduler::new());
		let sched2 = sched.clone();
		let handle = tokio::spawn(async move {
			let cancel = CancellationToken::new();
			sched2.next_job(&cancel).await
		});

		tokio::time::sleep(StdDuration::from_millis(20)).await;
		sched.close();

		let result = tokio::time::timeout(StdDuration::from_secs(2), handle)
			.await
			.expect("task did not finish")
			.expect("task panicked");
		assert!(matches!(result, Err(SchedulerError::Closed)));
	}

	#[tokio::test]
	async fn add_after_close_is_a_no_op() {
		let sched = Scheduler::new();
		sched.close();
		sched.add(job("dev-1", Utc::now()));
		assert!(sched.is_empty());
		assert!(matches!(sched.try_next_job(), Err(SchedulerError::Closed)));
	}

	#[tokio::test]
	async fn cancellation_unblocks_next_job() {
		let sched = Scheduler::new();
		let cancel = CancellationToken::new();
		cancel.cancel();
		let result = sched.next_job(&cancel).await;
		assert!(matches!(result, Err(SchedulerError::Cancelled)));
	}

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

	struct FakeHealth(HashMap<String, HealthStatus>);

	#[async_trait]
	impl HealthRepository for FakeHealth {
		async fn get(&self, device_id: &str) -> pulsewatch_core::Result<Option<HealthStatus>> {
			Ok(self.0.get(device_id).cloned())
		}
		async fn save(&self, _status: HealthStatus, _ttl_sec: i64) -> pulsewatch_core::Result<()> {
			Ok(())
		}
		async fn delete(&self, _device_id: &str) -> pulsewatch_core::Result<()> {
			Ok(())
		}
	}

	fn device(id: &str) -> Device {
		Device {
			id: id.to_string(),
			address: "127.0.0.1:9".to_string(),
			name: "127.0.0.1:9".to_string(),
			check_method: "tcp_check".to_string(),
			interval_sec: 30,
		}
	}

	#[tokio::test]
	async fn bootstrap_schedules_new_device_immediately() {
		let devices = FakeDevices(vec![device("dev-1")]);
		let health = FakeHealth(HashMap::new());

		let sched = Scheduler::new();
		sched.bootstrap(&devices, &health).await.unwrap();
		let got = sched.try_next_job().unwrap().expect("should be due now");
		assert_eq!(got.device_id, "dev-1");
	}

	#[tokio::test]
	async fn bootstrap_catch_up_collapses_missed_runs_into_one_job() {
		let devices = FakeDevices(vec![device("dev-1")]);

		let mut statuses = HashMap::new();
		statuses.insert(
			"dev-1".to_string(),
			HealthStatus {
				device_id: "dev-1".to_string(),
				status: "UP".to_string(),
				latency_ms: 1,
				// Five intervals ago: several runs were missed (e.g. the
				// process was down), but catch-up must produce exactly one
				// due job, not five queued jobs.
				last_check: Utc::now() - chrono::Duration::seconds(150),
				runner: "worker-1".to_string(),
				data: HashMap::new(),
			},
		);
		let health = FakeHealth(statuses);

		let sched = Scheduler::new();
		sched.bootstrap(&devices, &health).await.unwrap();
		assert_eq!(sched.len(), 1);
		assert!(sched.try_next_job().unwrap().is_some());
		assert!(sched.try_next_job().unwrap().is_none());
	}

	#[tokio::test]
	async fn bootstrap_future_last_check_is_not_due_yet() {
		let devices = FakeDevices(vec![device("dev-1")]);

		let mut statuses = HashMap::new();
		statuses.insert(
			"dev-1".to_string(),
			HealthStatus {
				device_id: "dev-1".to_string(),
				status: "UP".to_string(),
				latency_ms: 1,
				last_check: Utc::now(),
				runner: "worker-1".to_string(),
				data: HashMap::new(),
			},
		);
		let health = FakeHealth(statuses);

		let sched = Scheduler::new();
		sched.bootstrap(&devices, &health).await.unwrap();
		assert!(sched.try_next_job().unwrap().is_none());
	}

	#[tokio::test]
	async fn tie_broken_jobs_are_returned_in_insertion_order() {
		let sched = Scheduler::new();
		let now = Utc::now();
		sched.add(job("dev-1", now));
		sched.add(job("dev-2", now));

		let first = sched.try_next_job().unwrap().unwrap();
		assert_eq!(first.device_id, "dev-1");
	}
}
