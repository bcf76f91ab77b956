// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};

use crate::error::DbError;

/// Creates a `SqlitePool` with WAL mode and sane defaults, creating the
/// database file if it does not already exist.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.create_if_missing(true);

	let pool = SqlitePool::connect_with(options).await?;

	tracing::debug!("pulsewatch database pool created");
	Ok(pool)
}

/// Runs the embedded schema migration. Idempotent: every statement uses
/// `CREATE TABLE IF NOT EXISTS`.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	let migration = include_str!("../migrations/001_init.sql");
	for statement in migration.split(';').filter(|s| !s.trim().is_empty()) {
		sqlx::query(statement).execute(pool).await?;
	}
	Ok(())
}
