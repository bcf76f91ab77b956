// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("not found: {0}")]
	NotFound(String),

	#[error("invalid input: {0}")]
	InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl From<DbError> for pulsewatch_core::RepositoryError {
	fn from(e: DbError) -> Self {
		match e {
			DbError::NotFound(msg) => pulsewatch_core::RepositoryError::NotFound(msg),
			DbError::InvalidInput(msg) => pulsewatch_core::RepositoryError::InvalidInput(msg),
			other => pulsewatch_core::RepositoryError::Backend(other.into()),
		}
	}
}
