// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pulsewatch server binary: device/health REST API, job scheduler,
//! in-process worker pool, and remote-worker dispatch.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use pulsewatch_core::{CheckerConfig, DeviceRepository, HealthRepository};
use pulsewatch_engine::CheckEngine;
use pulsewatch_scheduler::Scheduler;
use pulsewatch_server::{create_app_state, create_router};
use pulsewatch_worker::{InternalWorker, Worker, WorkerManager};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often the health store's expired-row sweep runs (§10.4).
const HEALTH_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Pulsewatch server - fleet liveness monitor HTTP API and scheduler.
#[derive(Parser, Debug)]
#[command(name = "pulsewatch-server", about = "Pulsewatch fleet monitor server", version)]
struct Args {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let _args = Args::parse();

	dotenvy::dotenv().ok();

	let config = pulsewatch_config::load_server_config()?;

	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| config.logging.level.clone().into()))
		.with(tracing_subscriber::fmt::layer())
		.init();

	let pool = pulsewatch_db::create_pool(&config.database.url).await?;
	pulsewatch_db::run_migrations(&pool).await?;

	let device_repo = Arc::new(pulsewatch_db::DeviceRepository::new(pool.clone()));
	let health_repo = Arc::new(pulsewatch_db::HealthRepository::new(pool.clone()));
	let devices: Arc<dyn DeviceRepository> = device_repo.clone();
	let health: Arc<dyn HealthRepository> = health_repo.clone();

	let engine = Arc::new(CheckEngine::new());
	load_checkers_config(&engine, &config.checkers.config_path).await;

	let scheduler = Arc::new(Scheduler::new());
	scheduler.bootstrap(devices.as_ref(), health.as_ref()).await?;

	let state = create_app_state(devices.clone(), health.clone(), scheduler.clone(), engine.clone());
	let app = create_router(state, config.auth.preshared_worker_key.clone())
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

	let manager = Arc::new(WorkerManager::new(
		config.workers.local_worker_num,
		config.workers.restart_backoff_base_sec,
		config.workers.restart_backoff_max_sec,
		{
			let scheduler = scheduler.clone();
			let engine = engine.clone();
			let health = health.clone();
			move |id: usize| -> Arc<dyn Worker> { Arc::new(InternalWorker::new(format!("internal-{id}"), scheduler.clone(), engine.clone(), health.clone())) }
		},
	));
	manager.start();

	let sweep_handle = tokio::spawn(sweep_expired_health(health_repo));

	let addr = config.socket_addr();
	tracing::info!(%addr, local_worker_num = config.workers.local_worker_num, dev_mode = config.auth.dev_mode(), "starting pulsewatch-server");
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("received shutdown signal");
		}
	}

	scheduler.close();
	manager.stop().await;
	sweep_handle.abort();

	tracing::info!("pulsewatch-server shutdown complete");
	Ok(())
}

/// Loads `checkers.yaml` if present, registering a `command`-typed checker
/// per entry. Tolerant of the file being absent or unparsable — the
/// original source discards this error too (§10.6).
async fn load_checkers_config(engine: &CheckEngine, path: &str) {
	match tokio::fs::read_to_string(path).await {
		Ok(contents) => match serde_yaml::from_str::<CheckerConfig>(&contents) {
			Ok(config) => engine.load_config(&config).await,
			Err(err) => tracing::warn!(%path, error = %err, "failed to parse checkers config, continuing without it"),
		},
		Err(err) => tracing::debug!(%path, error = %err, "no checkers config found, continuing with built-in checkers only"),
	}
}

/// Periodically deletes expired health rows (§10.4) so the SQLite table
/// does not grow unbounded with devices that have stopped reporting.
async fn sweep_expired_health(health_repo: Arc<pulsewatch_db::HealthRepository>) {
	let mut ticker = tokio::time::interval(HEALTH_SWEEP_INTERVAL);
	loop {
		ticker.tick().await;
		match health_repo.sweep_expired().await {
			Ok(removed) if removed > 0 => tracing::debug!(removed, "swept expired health records"),
			Ok(_) => {}
			Err(err) => tracing::warn!(error = %err, "health sweep failed"),
		}
	}
}
