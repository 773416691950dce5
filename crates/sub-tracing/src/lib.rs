// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Tracing subsystem: installs the process wide `tracing` subscriber.

pub mod builder;
pub mod subsystem;

pub use builder::{LogFormat, TracingBuilder};
pub use subsystem::TracingSubsystem;
