// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// A worker loop's terminal outcomes (§7). Everything else — scheduler
/// hiccups, HTTP transport failures, checker errors — is logged and
/// retried by the loop itself; it never leaves the loop as an `Err` here.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
	/// The worker's cancellation token fired. The supervising
	/// [`crate::manager::WorkerManager`] treats this the same as a clean
	/// exit: no restart.
	#[error("cancelled")]
	Cancelled,

	/// A worker loop failed for a reason other than cancellation. Neither
	/// [`crate::internal::InternalWorker`] nor [`crate::remote::RemoteWorker`]
	/// produce this today (§7: nothing inside either loop is fatal except
	/// cancellation or scheduler closure) — it exists for other `Worker`
	/// implementations the manager supervises generically.
	#[error("worker failed: {0}")]
	Failed(String),
}

pub type Result<T> = std::result::Result<T, WorkerError>;
