// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
	/// The caller's cancellation token fired before a job became due.
	#[error("cancelled")]
	Cancelled,

	/// The scheduler has been closed (§4.1 "Closed" state).
	#[error("scheduler closed")]
	Closed,

	/// A repository error surfaced while bootstrapping from storage.
	#[error("bootstrap failed: {0}")]
	Bootstrap(#[from] pulsewatch_core::RepositoryError),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
