// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory pool helpers for repository unit tests.

use sqlx::sqlite::SqlitePool;

pub async fn create_test_pool() -> SqlitePool {
	let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
	crate::pool::run_migrations(&pool).await.unwrap();
	pool
}
