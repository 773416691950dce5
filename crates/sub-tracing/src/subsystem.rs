// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::any::Any;

use murmur_sub_api::{HealthStatus, Subsystem};
use murmur_type::Result;
use tracing_subscriber::fmt;

use crate::builder::{LogFormat, TracingBuilder};

/// Installs the global subscriber on start.
///
/// Only one global subscriber can exist per process. If another one is
/// already installed, start succeeds and the existing subscriber stays.
pub struct TracingSubsystem {
	config: TracingBuilder,
	running: bool,
}

impl TracingSubsystem {
	pub fn new(config: TracingBuilder) -> Self {
		Self {
			config,
			running: false,
		}
	}

	pub fn config(&self) -> &TracingBuilder {
		&self.config
	}

	fn install(&self) -> bool {
		let builder = fmt().with_env_filter(self.config.env_filter()).with_target(self.config.shows_target());

		let installed = match self.config.format() {
			LogFormat::Compact => builder.compact().try_init(),
			LogFormat::Json => builder.json().try_init(),
		};
		installed.is_ok()
	}
}

impl Subsystem for TracingSubsystem {
	fn name(&self) -> &'static str {
		"Tracing"
	}

	fn start(&mut self) -> Result<()> {
		if self.running {
			return Ok(());
		}

		if self.install() {
			tracing::debug!("Tracing subscriber installed at level {}", self.config.level());
		}
		self.running = true;
		Ok(())
	}

	fn shutdown(&mut self) -> Result<()> {
		self.running = false;
		Ok(())
	}

	fn is_running(&self) -> bool {
		self.running
	}

	fn health_status(&self) -> HealthStatus {
		if self.running {
			HealthStatus::Healthy
		} else {
			HealthStatus::Failed {
				description: "Not running".to_string(),
			}
		}
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}
