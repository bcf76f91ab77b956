// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Something a [`crate::manager::WorkerManager`] can supervise: a long-lived
/// loop that runs until its scheduler source is exhausted or `cancel` fires.
#[async_trait]
pub trait Worker: Send + Sync {
	async fn run(&self, cancel: CancellationToken) -> Result<()>;
}
