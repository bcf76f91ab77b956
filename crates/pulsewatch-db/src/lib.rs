// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite-backed implementations of the `pulsewatch-core` repository
//! contracts.

pub mod device;
pub mod error;
pub mod health;
pub mod pool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use device::DeviceRepository;
pub use error::DbError;
pub use health::HealthRepository;
pub use pool::{create_pool, run_migrations};
