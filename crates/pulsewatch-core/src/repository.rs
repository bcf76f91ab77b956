// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Collaborator contracts for the persistence backends (§6.1 of the spec).
//!
//! Any store that implements these two traits is sufficient for the
//! scheduler, engine, and dispatch endpoints to function; `pulsewatch-db`
//! provides one concrete (SQLite) implementation.

use async_trait::async_trait;

use crate::device::Device;
use crate::error::Result;
use crate::health::HealthStatus;

/// Persists device definitions and maintains the address → id index.
#[async_trait]
pub trait DeviceRepository: Send + Sync {
	/// All devices, in implementation-defined order.
	async fn list(&self) -> Result<Vec<Device>>;

	/// A single device by id, or `None` if it does not exist.
	async fn get_by_id(&self, id: &str) -> Result<Option<Device>>;

	/// Inserts or updates a device. Assigns a fresh id when `device.id` is
	/// empty. Rejects `interval_sec <= 0` with
	/// [`crate::error::RepositoryError::InvalidInput`]. Returns the stored
	/// device (with its id filled in).
	async fn save(&self, device: Device) -> Result<Device>;

	/// Removes a device by id. Not an error if the device did not exist.
	async fn delete_by_id(&self, id: &str) -> Result<()>;
}

/// Persists the latest observed health per device, with TTL expiry.
#[async_trait]
pub trait HealthRepository: Send + Sync {
	/// The current health record for a device, or `None` if absent or
	/// expired.
	async fn get(&self, device_id: &str) -> Result<Option<HealthStatus>>;

	/// Stores `status`, expiring it after `ttl_sec` seconds. `ttl_sec == 0`
	/// means "no expiry". Stamps `last_check = now` if it was left at the
	/// zero instant, and ensures `data` is non-null.
	async fn save(&self, status: HealthStatus, ttl_sec: i64) -> Result<()>;

	/// Removes a device's health record, if any.
	async fn delete(&self, device_id: &str) -> Result<()>;
}
