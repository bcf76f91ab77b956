// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use pulsewatch_core::{self as core, HealthStatus};

use crate::error::Result;

/// SQLite-backed [`core::HealthRepository`].
///
/// TTL is realized as a nullable `expires_at` column: reads filter out rows
/// whose `expires_at` has passed, so a stale entry behaves as absent without
/// a separate sweep being required for correctness (a periodic cleanup task
/// still reclaims the rows — see `pulsewatch-server`'s job registration).
#[derive(Clone)]
pub struct HealthRepository {
	pool: SqlitePool,
}

impl HealthRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn get(&self, device_id: &str) -> Result<Option<HealthStatus>> {
		let now = Utc::now();
		let row = sqlx::query_as::<_, (String, String, i64, DateTime<Utc>, String, String, Option<DateTime<Utc>>)>(
			"SELECT device_id, status, latency_ms, last_check, runner, data, expires_at FROM health_status WHERE device_id = ?",
		)
		.bind(device_id)
		.fetch_optional(&self.pool)
		.await?;

		let Some((device_id, status, latency_ms, last_check, runner, data, expires_at)) = row else {
			return Ok(None);
		};

		if let Some(expires_at) = expires_at {
			if expires_at <= now {
				return Ok(None);
			}
		}

		let data: HashMap<String, serde_json::Value> = serde_json::from_str(&data)?;

		Ok(Some(HealthStatus {
			device_id,
			status,
			latency_ms,
			last_check,
			runner,
			data,
		}))
	}

	#[tracing::instrument(skip(self, status), fields(device_id = %status.device_id))]
	pub async fn save(&self, mut status: HealthStatus, ttl_sec: i64) -> Result<()> {
		if status.last_check == core::zero_time() {
			status.last_check = Utc::now();
		}
		let expires_at = if ttl_sec > 0 {
			Some(Utc::now() + chrono::Duration::seconds(ttl_sec))
		} else {
			None
		};
		let data = serde_json::to_string(&status.data)?;

		sqlx::query(
			r#"
			INSERT INTO health_status (device_id, status, latency_ms, last_check, runner, data, expires_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			ON CONFLICT(device_id) DO UPDATE SET
				status = excluded.status,
				latency_ms = excluded.latency_ms,
				last_check = excluded.last_check,
				runner = excluded.runner,
				data = excluded.data,
				expires_at = excluded.expires_at
			"#,
		)
		.bind(&status.device_id)
		.bind(&status.status)
		.bind(status.latency_ms)
		.bind(status.last_check)
		.bind(&status.runner)
		.bind(&data)
		.bind(expires_at)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	#[tracing::instrument(skip(self))]
	pub async fn delete(&self, device_id: &str) -> Result<()> {
		sqlx::query("DELETE FROM health_status WHERE device_id = ?")
			.bind(device_id)
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	/// Sweeps expired rows. Grounded in the reference job scheduler's
	/// periodic-cleanup convention; run on a timer by the server binary.
	#[tracing::instrument(skip(self))]
	pub async fn sweep_expired(&self) -> Result<u64> {
		let result = sqlx::query("DELETE FROM health_status WHERE expires_at IS NOT NULL AND expires_at <= ?")
			.bind(Utc::now())
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected())
	}
}

#[async_trait]
impl core::HealthRepository for HealthRepository {
	async fn get(&self, device_id: &str) -> core::Result<Option<HealthStatus>> {
		Ok(self.get(device_id).await?)
	}

	async fn save(&self, status: HealthStatus, ttl_sec: i64) -> core::Result<()> {
		Ok(self.save(status, ttl_sec).await?)
	}

	async fn delete(&self, device_id: &str) -> core::Result<()> {
		Ok(self.delete(device_id).await?)
	}
}
