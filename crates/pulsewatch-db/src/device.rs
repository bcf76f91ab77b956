// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use pulsewatch_core::{self as core, Device};

use crate::error::{DbError, Result};

/// SQLite-backed [`core::DeviceRepository`].
#[derive(Clone)]
pub struct DeviceRepository {
	pool: SqlitePool,
}

impl DeviceRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn list(&self) -> Result<Vec<Device>> {
		let rows = sqlx::query_as::<_, (String, String, String, String, i64)>(
			"SELECT id, address, name, check_method, interval_sec FROM devices ORDER BY name",
		)
		.fetch_all(&self.pool)
		.await?;

		Ok(
			rows
				.into_iter()
				.map(|(id, address, name, check_method, interval_sec)| Device {
					id,
					address,
					name,
					check_method,
					interval_sec,
				})
				.collect(),
		)
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_by_id(&self, id: &str) -> Result<Option<Device>> {
		let row = sqlx::query_as::<_, (String, String, String, String, i64)>(
			"SELECT id, address, name, check_method, interval_sec FROM devices WHERE id = ?",
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(
			row.map(|(id, address, name, check_method, interval_sec)| Device {
				id,
				address,
				name,
				check_method,
				interval_sec,
			}),
		)
	}

	#[tracing::instrument(skip(self, device), fields(device_id = %device.id))]
	pub async fn save(&self, mut device: Device) -> Result<Device> {
		if device.interval_sec <= 0 {
			return Err(DbError::InvalidInput(format!(
				"interval_sec must be positive, got {}",
				device.interval_sec
			)));
		}
		if device.check_method.is_empty() {
			return Err(DbError::InvalidInput(
				"check_method must not be empty".to_string(),
			));
		}
		if device.id.is_empty() {
			device.id = Uuid::new_v4().to_string();
		}
		if device.name.is_empty() {
			device.name = device.address.clone();
		}

		let now = Utc::now().to_rfc3339();
		let mut tx = self.pool.begin().await?;

		sqlx::query(
			r#"
			INSERT INTO devices (id, address, name, check_method, interval_sec, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			ON CONFLICT(id) DO UPDATE SET
				address = excluded.address,
				name = excluded.name,
				check_method = excluded.check_method,
				interval_sec = excluded.interval_sec,
				updated_at = excluded.updated_at
			"#,
		)
		.bind(&device.id)
		.bind(&device.address)
		.bind(&device.name)
		.bind(&device.check_method)
		.bind(device.interval_sec)
		.bind(&now)
		.bind(&now)
		.execute(&mut *tx)
		.await?;

		// Replace the address index: drop any stale entries this device
		// previously owned, then point its current address at it.
		sqlx::query("DELETE FROM device_address_index WHERE device_id = ? AND address != ?")
			.bind(&device.id)
			.bind(&device.address)
			.execute(&mut *tx)
			.await?;

		sqlx::query(
			r#"
			INSERT INTO device_address_index (address, device_id) VALUES (?, ?)
			ON CONFLICT(address) DO UPDATE SET device_id = excluded.device_id
			"#,
		)
		.bind(&device.address)
		.bind(&device.id)
		.execute(&mut *tx)
		.await?;

		tx.commit().await?;

		Ok(device)
	}

	#[tracing::instrument(skip(self))]
	pub async fn delete_by_id(&self, id: &str) -> Result<()> {
		sqlx::query("DELETE FROM devices WHERE id = ?")
			.bind(id)
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	/// Looks a device id up by its configured address, via the secondary
	/// index maintained by [`Self::save`].
	#[tracing::instrument(skip(self))]
	pub async fn get_id_by_address(&self, address: &str) -> Result<Option<String>> {
		let row = sqlx::query_as::<_, (String,)>(
			"SELECT device_id FROM device_address_index WHERE address = ?",
		)
		.bind(address)
		.fetch_optional(&self.pool)
		.await?;
		Ok(row.map(|(id,)| id))
	}
}

#[async_trait]
impl core::DeviceRepository for DeviceRepository {
	async fn list(&self) -> core::Result<Vec<Device>> {
		Ok(self.list().await?)
	}

	async fn get_by_id(&self, id: &str) -> core::Result<Option<Device>> {
		Ok(self.get_by_id(id).await?)
	}

	async fn save(&self, device: Device) -> core::Result<Device> {
		Ok(self.save(device).await?)
	}

	async fn delete_by_id(&self, id: &str) -> core::Result<()> {
		Ok(self.delete_by_id(id).await?)
	}
}
