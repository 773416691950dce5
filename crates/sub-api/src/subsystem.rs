// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::any::Any;

use murmur_type::Result;

/// Health of a single subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
	Healthy,
	Warning {
		description: String,
	},
	Failed {
		description: String,
	},
}

impl HealthStatus {
	pub fn is_healthy(&self) -> bool {
		matches!(self, HealthStatus::Healthy)
	}
}

/// Lifecycle of a long running server component.
///
/// `start` and `shutdown` are called from outside the runtime and may block on it.
/// Both must be idempotent.
pub trait Subsystem: Send + Sync + Any {
	fn name(&self) -> &'static str;

	fn start(&mut self) -> Result<()>;

	fn shutdown(&mut self) -> Result<()>;

	fn is_running(&self) -> bool;

	fn health_status(&self) -> HealthStatus;

	fn as_any(&self) -> &dyn Any;

	fn as_any_mut(&mut self) -> &mut dyn Any;
}
