// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default checker method assigned to a device when none is given.
pub const DEFAULT_CHECK_METHOD: &str = "tcp_check";

/// Default check interval, in seconds, assigned when none is given.
pub const DEFAULT_INTERVAL_SEC: i64 = 10;

/// A configured monitoring target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
	pub id: String,
	pub address: String,
	pub name: String,
	pub check_method: String,
	pub interval_sec: i64,
}

impl Device {
	/// Builds a device for insertion, assigning a fresh id and defaulting
	/// `name` to `address` the way the reference create handler does.
	pub fn new(address: impl Into<String>, check_method: impl Into<String>, interval_sec: i64) -> Self {
		let address = address.into();
		Device {
			id: Uuid::new_v4().to_string(),
			name: address.clone(),
			address,
			check_method: check_method.into(),
			interval_sec,
		}
	}
}
