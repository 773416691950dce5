// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8889";
pub const DEFAULT_MAX_CONNECTIONS: usize = 1024;
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct WsConfig {
	pub bind_addr: String,
	/// Connections beyond this are accepted at TCP level and closed at once.
	pub max_connections: usize,
	/// How long shutdown waits for open connections to close.
	pub drain_timeout: Duration,
}

impl WsConfig {
	pub fn new(bind_addr: impl Into<String>) -> Self {
		Self {
			bind_addr: bind_addr.into(),
			..Self::default()
		}
	}

	pub fn with_max_connections(mut self, max_connections: usize) -> Self {
		self.max_connections = max_connections.max(1);
		self
	}

	pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
		self.drain_timeout = drain_timeout;
		self
	}
}

impl Default for WsConfig {
	fn default() -> Self {
		Self {
			bind_addr: DEFAULT_BIND_ADDR.to_string(),
			max_connections: DEFAULT_MAX_CONNECTIONS,
			drain_timeout: DEFAULT_DRAIN_TIMEOUT,
		}
	}
}
