// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared data model and repository contracts for Pulsewatch.
//!
//! This crate holds the types every other Pulsewatch crate agrees on —
//! [`Device`], [`CheckJob`], [`HealthStatus`] — plus the repository traits
//! concrete storage backends (e.g. `pulsewatch-db`) implement. It has no
//! dependency on any particular async runtime or storage engine.

pub mod checker_config;
pub mod device;
pub mod error;
pub mod health;
pub mod job;
pub mod repository;

pub use checker_config::{CheckerConfig, CheckerEntry};
pub use device::{Device, DEFAULT_CHECK_METHOD, DEFAULT_INTERVAL_SEC};
pub use error::{RepositoryError, Result};
pub use health::{zero_time, HealthStatus, STATUS_DOWN, STATUS_UNKNOWN, STATUS_UNKNOWN_METHOD, STATUS_UP};
pub use job::CheckJob;
pub use repository::{DeviceRepository, HealthRepository};
