// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Worker loops that consume jobs and produce health reports (§4.3-§4.5):
//! an in-process [`InternalWorker`], an HTTP [`RemoteWorker`], and a
//! [`WorkerManager`] that supervises any number of either with bounded
//! restart backoff.

mod error;
mod internal;
mod manager;
mod remote;
mod worker;

pub use error::WorkerError;
pub use internal::InternalWorker;
pub use manager::WorkerManager;
pub use remote::RemoteWorker;
pub use worker::Worker;
