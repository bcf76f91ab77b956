// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level shape of `checkers.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckerConfig {
	#[serde(default)]
	pub checkers: HashMap<String, CheckerEntry>,
}

/// One configured checker. Only `type = "command"` is currently realized;
/// other types are parsed but ignored (unknown types are skipped at load
/// time, matching the original's tolerant loader).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerEntry {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub command: String,
	#[serde(default)]
	pub method: Option<String>,
	#[serde(default)]
	pub path: Option<String>,
	#[serde(default)]
	pub timeout_sec: Option<i64>,
}
