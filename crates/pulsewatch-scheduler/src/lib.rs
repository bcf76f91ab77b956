// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Time-ordered job scheduler (§4.1).
//!
//! Tracks exactly one pending [`pulsewatch_core::CheckJob`] per device and
//! hands them to callers (workers) in due-time order, with catch-up
//! semantics applied at bootstrap from durable state.

pub mod error;
pub mod scheduler;

pub use error::SchedulerError;
pub use scheduler::Scheduler;
