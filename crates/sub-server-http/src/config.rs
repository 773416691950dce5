// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8888";
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Upper bound for `GET /messages?limit=`.
pub const MAX_HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Clone)]
pub struct HttpConfig {
	pub bind_addr: String,
	/// `limit` used by `GET /messages` when the client sends none.
	pub history_limit: usize,
}

impl HttpConfig {
	pub fn new(bind_addr: impl Into<String>) -> Self {
		Self {
			bind_addr: bind_addr.into(),
			..Self::default()
		}
	}

	pub fn with_history_limit(mut self, history_limit: usize) -> Self {
		self.history_limit = history_limit.clamp(1, MAX_HISTORY_LIMIT);
		self
	}
}

impl Default for HttpConfig {
	fn default() -> Self {
		Self {
			bind_addr: DEFAULT_BIND_ADDR.to_string(),
			history_limit: DEFAULT_HISTORY_LIMIT,
		}
	}
}
