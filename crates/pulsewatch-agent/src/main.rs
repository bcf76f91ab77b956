// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pulsewatch remote worker binary: polls a Pulsewatch server for due
//! checks and reports outcomes back over HTTP (§4.4). Carries no scheduler
//! or storage of its own — the server it polls is the single source of
//! truth.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use pulsewatch_core::CheckerConfig;
use pulsewatch_engine::CheckEngine;
use pulsewatch_worker::{RemoteWorker, Worker, WorkerManager};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pulsewatch agent - polls a Pulsewatch server and runs checks remotely.
#[derive(Parser, Debug)]
#[command(name = "pulsewatch-agent", about = "Pulsewatch remote worker", version)]
struct Args {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let _args = Args::parse();

	dotenvy::dotenv().ok();

	let config = pulsewatch_config::load_agent_config()?;

	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| config.logging.level.clone().into()))
		.with(tracing_subscriber::fmt::layer())
		.init();

	let engine = Arc::new(CheckEngine::new());
	load_checkers_config(&engine, &config.checkers.config_path).await;

	let idle_sleep = Duration::from_secs(config.workers.idle_poll_interval_sec);
	let manager = Arc::new(WorkerManager::new(
		config.remote.worker_num,
		config.workers.restart_backoff_base_sec,
		config.workers.restart_backoff_max_sec,
		{
			let server_url = config.remote.server_url.clone();
			let worker_id = config.remote.worker_id.clone();
			let worker_key = config.remote.worker_key.clone();
			let engine = engine.clone();
			move |id: usize| -> Arc<dyn Worker> {
				let slot_id = if id == 0 { worker_id.clone() } else { format!("{worker_id}-{id}") };
				Arc::new(RemoteWorker::new(slot_id, worker_key.clone(), server_url.clone(), engine.clone(), idle_sleep))
			}
		},
	));

	tracing::info!(
		server_url = %config.remote.server_url,
		worker_id = %config.remote.worker_id,
		worker_num = config.remote.worker_num,
		authenticated = config.remote.worker_key.is_some(),
		"starting pulsewatch-agent"
	);
	manager.start();

	tokio::signal::ctrl_c().await?;
	tracing::info!("received shutdown signal");

	manager.stop().await;
	tracing::info!("pulsewatch-agent shutdown complete");
	Ok(())
}

/// Loads `checkers.yaml` if present, tolerating its absence or a parse
/// failure exactly as `pulsewatch-server` does (§10.6) — both processes
/// run the same checker set independent of which one happens to load it.
async fn load_checkers_config(engine: &CheckEngine, path: &str) {
	match tokio::fs::read_to_string(path).await {
		Ok(contents) => match serde_yaml::from_str::<CheckerConfig>(&contents) {
			Ok(config) => engine.load_config(&config).await,
			Err(err) => tracing::warn!(%path, error = %err, "failed to parse checkers config, continuing without it"),
		},
		Err(err) => tracing::debug!(%path, error = %err, "no checkers config found, continuing with built-in checkers only"),
	}
}
