// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Small helpers for reading typed values out of the process environment.
//!
//! These stand in for the reference codebase's `EnvSource`/`ConfigSource`
//! layering, scaled down to the handful of scalar settings this system
//! needs — there is no TOML file or multi-source merge to perform here.

use crate::error::{ConfigError, Result};

pub fn string(key: &'static str, default: &str) -> String {
	std::env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn opt_string(key: &'static str) -> Option<String> {
	std::env::var(key).ok().filter(|v| !v.is_empty())
}

pub fn required_string(key: &'static str) -> Result<String> {
	std::env::var(key)
		.ok()
		.filter(|v| !v.is_empty())
		.ok_or(ConfigError::MissingRequired(key))
}

pub fn i64(key: &'static str, default: i64) -> Result<i64> {
	match std::env::var(key) {
		Ok(raw) => raw.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
			key,
			message: e.to_string(),
		}),
		Err(_) => Ok(default),
	}
}

pub fn u16(key: &'static str, default: u16) -> Result<u16> {
	match std::env::var(key) {
		Ok(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
			key,
			message: e.to_string(),
		}),
		Err(_) => Ok(default),
	}
}

pub fn usize(key: &'static str, default: usize) -> Result<usize> {
	match std::env::var(key) {
		Ok(raw) => raw
			.parse::<usize>()
			.map_err(|e| ConfigError::InvalidValue {
				key,
				message: e.to_string(),
			}),
		Err(_) => Ok(default),
	}
}
