// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Checker registry and job execution engine (§4.2).
//!
//! [`CheckEngine`] maps method names to pluggable [`Checker`] implementations
//! and runs a [`pulsewatch_core::CheckJob`] against its checker under a
//! timeout, producing a normalized [`pulsewatch_core::HealthStatus`].

pub mod checker;
pub mod command;
pub mod engine;
pub mod tcp;

pub use checker::{CheckOutcome, Checker};
pub use command::CommandChecker;
pub use engine::CheckEngine;
pub use tcp::TcpChecker;
