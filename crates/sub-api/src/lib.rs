// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Subsystem API crate providing common interfaces for murmur subsystems
//!
//! Every long running part of the server (tracing, HTTP, WebSocket) implements
//! [`Subsystem`] and runs on the process wide [`SharedRuntime`].

pub mod runtime;
pub mod server;
pub mod subsystem;

pub use runtime::SharedRuntime;
pub use server::ServerState;
pub use subsystem::{HealthStatus, Subsystem};
