// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use murmur_broker::Broker;
use tokio::sync::watch;

use crate::config::HttpConfig;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
	broker: Broker,
	config: Arc<HttpConfig>,
	shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
	pub fn new(broker: Broker, config: HttpConfig) -> Self {
		let (shutdown, _) = watch::channel(false);
		Self {
			broker,
			config: Arc::new(config),
			shutdown: Arc::new(shutdown),
		}
	}

	pub fn broker(&self) -> &Broker {
		&self.broker
	}

	pub fn config(&self) -> &HttpConfig {
		&self.config
	}

	/// Release every held long-poll and answer new ones at once.
	pub fn begin_shutdown(&self) {
		self.shutdown.send_replace(true);
	}

	pub(crate) fn reopen(&self) {
		self.shutdown.send_replace(false);
	}

	/// Completes once [`begin_shutdown`](Self::begin_shutdown) was called.
	pub async fn closed(&self) {
		let mut rx = self.shutdown.subscribe();
		let _ = rx.wait_for(|closed| *closed).await;
	}
}
