// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

/// Default number of messages scanned when looking up a cursor in an unbounded log.
pub const DEFAULT_POLL_WINDOW: usize = 50;

/// Configuration for a [`Broker`](crate::Broker).
#[derive(Debug, Clone)]
pub struct BrokerConfig {
	/// How many recent messages a poll scans for its cursor. Bounded logs use
	/// their own capacity instead.
	pub poll_window: usize,
	/// Upper bound on how long [`Broker::wait`](crate::Broker::wait) suspends.
	/// `None` waits until a message arrives or the caller goes away.
	pub max_wait: Option<Duration>,
}

impl BrokerConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_poll_window(mut self, poll_window: usize) -> Self {
		self.poll_window = poll_window.max(1);
		self
	}

	pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
		self.max_wait = Some(max_wait);
		self
	}
}

impl Default for BrokerConfig {
	fn default() -> Self {
		Self {
			poll_window: DEFAULT_POLL_WINDOW,
			max_wait: None,
		}
	}
}
