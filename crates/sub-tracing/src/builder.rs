// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing_subscriber::EnvFilter;

use crate::subsystem::TracingSubsystem;

/// Output format of the subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
	#[default]
	Compact,
	Json,
}

/// Builder for configuring the tracing subsystem
#[derive(Debug, Clone)]
pub struct TracingBuilder {
	level: String,
	format: LogFormat,
	with_target: bool,
}

impl TracingBuilder {
	pub fn new() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Compact,
			with_target: true,
		}
	}

	/// Default filter directive, e.g. `debug` or `murmur_broker=trace,info`.
	/// `RUST_LOG` takes precedence when set.
	pub fn with_level(mut self, level: impl Into<String>) -> Self {
		self.level = level.into();
		self
	}

	pub fn with_format(mut self, format: LogFormat) -> Self {
		self.format = format;
		self
	}

	pub fn json(self) -> Self {
		self.with_format(LogFormat::Json)
	}

	pub fn with_target(mut self, with_target: bool) -> Self {
		self.with_target = with_target;
		self
	}

	pub fn level(&self) -> &str {
		&self.level
	}

	pub fn format(&self) -> LogFormat {
		self.format
	}

	pub fn shows_target(&self) -> bool {
		self.with_target
	}

	pub(crate) fn env_filter(&self) -> EnvFilter {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
	}

	pub fn build(self) -> TracingSubsystem {
		TracingSubsystem::new(self)
	}
}

impl Default for TracingBuilder {
	fn default() -> Self {
		Self::new()
	}
}
