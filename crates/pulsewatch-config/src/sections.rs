// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Individual configuration sections, each resolvable from its own slice of
//! the process environment.

use crate::env;
use crate::error::Result;

/// HTTP listener settings for `pulsewatch-server`.
#[derive(Debug, Clone)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
}

impl HttpConfig {
	pub fn from_env() -> Result<Self> {
		Ok(Self {
			host: env::string("PULSEWATCH_HOST", "0.0.0.0"),
			port: env::u16("PULSEWATCH_PORT", 8080)?,
		})
	}

	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}
}

impl Default for HttpConfig {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 8080,
		}
	}
}

/// Storage backend settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
	pub url: String,
}

impl DatabaseConfig {
	pub fn from_env() -> Result<Self> {
		Ok(Self {
			url: env::string("PULSEWATCH_DATABASE_URL", "sqlite://pulsewatch.db"),
		})
	}
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			url: "sqlite://pulsewatch.db".to_string(),
		}
	}
}

/// Dispatch HMAC authentication settings (server side).
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
	/// Shared pre-shared key used to verify remote-worker requests.
	/// `None` (equivalently, an unset/empty env var) disables authentication
	/// — development mode, per §6.2.
	pub preshared_worker_key: Option<String>,
}

impl AuthConfig {
	pub fn from_env() -> Result<Self> {
		Ok(Self {
			preshared_worker_key: env::opt_string("PRESHARED_WORKER_KEY"),
		})
	}

	pub fn dev_mode(&self) -> bool {
		self.preshared_worker_key.is_none()
	}
}

/// Internal worker pool settings (server side).
#[derive(Debug, Clone)]
pub struct WorkersConfig {
	/// Number of in-process internal workers to start; 0 disables local
	/// polling entirely (remote workers only).
	pub local_worker_num: usize,
	/// Delay after an empty poll or a transient error before retrying.
	pub idle_poll_interval_sec: u64,
	/// Backoff base/max for `WorkerManager`'s supervision loop.
	pub restart_backoff_base_sec: u64,
	pub restart_backoff_max_sec: u64,
}

impl WorkersConfig {
	pub fn from_env() -> Result<Self> {
		Ok(Self {
			local_worker_num: env::usize("LOCAL_WORKER_NUM", 1)?,
			idle_poll_interval_sec: env::i64("PULSEWATCH_IDLE_POLL_INTERVAL_SEC", 1)?.max(0) as u64,
			restart_backoff_base_sec: env::i64("PULSEWATCH_RESTART_BACKOFF_BASE_SEC", 1)?.max(1) as u64,
			restart_backoff_max_sec: env::i64("PULSEWATCH_RESTART_BACKOFF_MAX_SEC", 30)?.max(1) as u64,
		})
	}
}

impl Default for WorkersConfig {
	fn default() -> Self {
		Self {
			local_worker_num: 1,
			idle_poll_interval_sec: 1,
			restart_backoff_base_sec: 1,
			restart_backoff_max_sec: 30,
		}
	}
}

/// Remote-worker process settings (agent side).
#[derive(Debug, Clone)]
pub struct RemoteConfig {
	pub server_url: String,
	pub worker_id: String,
	pub worker_key: Option<String>,
	pub worker_num: usize,
}

impl RemoteConfig {
	pub fn from_env() -> Result<Self> {
		let worker_num = env::usize("WORKER_NUM", 1)?;
		Ok(Self {
			server_url: env::required_string("MONITOR_SERVER_URL")?,
			worker_id: env::required_string("WORKER_ID")?,
			worker_key: env::opt_string("WORKER_KEY"),
			worker_num: worker_num.max(1),
		})
	}
}

/// Path to the (optional) checker definitions file, shared by server and
/// agent processes.
#[derive(Debug, Clone)]
pub struct CheckersConfig {
	pub config_path: String,
}

impl CheckersConfig {
	pub fn from_env() -> Result<Self> {
		Ok(Self {
			config_path: env::string("PULSEWATCH_CHECKERS_CONFIG", "checkers.yaml"),
		})
	}
}

impl Default for CheckersConfig {
	fn default() -> Self {
		Self {
			config_path: "checkers.yaml".to_string(),
		}
	}
}

/// Logging verbosity, consumed by `tracing_subscriber::EnvFilter`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
	pub level: String,
}

impl LoggingConfig {
	pub fn from_env() -> Result<Self> {
		Ok(Self {
			level: env::string("PULSEWATCH_LOG_LEVEL", "info"),
		})
	}
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
		}
	}
}
