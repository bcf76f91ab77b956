// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: &'static str, message: String },

	#[error("missing required environment variable: {0}")]
	MissingRequired(&'static str),

	#[error("validation failed: {0}")]
	Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
