// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Errors surfaced by the repository traits in [`crate::repository`].
///
/// Kept backend-agnostic: concrete stores (e.g. `pulsewatch-db`) wrap their
/// own error types into this one at the trait boundary.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
	#[error("not found: {0}")]
	NotFound(String),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("backend error: {0}")]
	Backend(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
