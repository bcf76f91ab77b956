// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment-driven configuration for the Pulsewatch server and remote
//! worker (agent) binaries.
//!
//! Each section resolves independently from the process environment
//! (`PULSEWATCH_*`, plus a handful of unprefixed names the spec fixes:
//! `PRESHARED_WORKER_KEY`, `LOCAL_WORKER_NUM`, `MONITOR_SERVER_URL`,
//! `WORKER_ID`, `WORKER_KEY`, `WORKER_NUM`). Call [`load_server_config`] or
//! [`load_agent_config`] once at process startup, after `dotenvy::dotenv()`
//! has had a chance to populate the environment from a `.env` file.

pub mod env;
pub mod error;
pub mod sections;

pub use error::ConfigError;
pub use sections::{
	AuthConfig, CheckersConfig, DatabaseConfig, HttpConfig, LoggingConfig, RemoteConfig,
	WorkersConfig,
};

/// Fully resolved configuration for the `pulsewatch-server` binary.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub workers: WorkersConfig,
	pub checkers: CheckersConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	pub fn socket_addr(&self) -> String {
		self.http.socket_addr()
	}
}

/// Fully resolved configuration for the `pulsewatch-agent` (remote worker)
/// binary.
#[derive(Debug, Clone)]
pub struct AgentConfig {
	pub remote: RemoteConfig,
	/// Reused for its `idle_poll_interval_sec` and `restart_backoff_*`
	/// fields; `local_worker_num` is meaningless to the agent and ignored.
	pub workers: WorkersConfig,
	pub checkers: CheckersConfig,
	pub logging: LoggingConfig,
}

/// Loads and validates the server's configuration from the environment.
pub fn load_server_config() -> error::Result<ServerConfig> {
	let config = ServerConfig {
		http: HttpConfig::from_env()?,
		database: DatabaseConfig::from_env()?,
		auth: AuthConfig::from_env()?,
		workers: WorkersConfig::from_env()?,
		checkers: CheckersConfig::from_env()?,
		logging: LoggingConfig::from_env()?,
	};

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		local_worker_num = config.workers.local_worker_num,
		dev_mode = config.auth.dev_mode(),
		"pulsewatch-server configuration loaded"
	);

	Ok(config)
}

/// Loads and validates the remote worker's configuration from the
/// environment. `MONITOR_SERVER_URL` and `WORKER_ID` are required.
pub fn load_agent_config() -> error::Result<AgentConfig> {
	let config = AgentConfig {
		remote: RemoteConfig::from_env()?,
		workers: WorkersConfig::from_env()?,
		checkers: CheckersConfig::from_env()?,
		logging: LoggingConfig::from_env()?,
	};

	tracing::info!(
		server_url = %config.remote.server_url,
		worker_id = %config.remote.worker_id,
		worker_num = config.remote.worker_num,
		"pulsewatch-agent configuration loaded"
	);

	Ok(config)
}
