// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{any::Any, net::SocketAddr, sync::Arc, time::Duration};

use murmur_broker::Broker;
use murmur_sub_api::{HealthStatus, ServerState, SharedRuntime, Subsystem};
use murmur_type::Result;
use tokio::{
	net::TcpListener,
	sync::{Semaphore, watch},
	task::JoinHandle,
	time::timeout,
};

use crate::{config::WsConfig, handler::handle_connection};

/// WebSocket server on the shared runtime.
///
/// Every connection holds one permit of a semaphore sized by
/// `max_connections`; a connection over the limit is dropped right after
/// accept. The number of permits handed out is the active connection count.
pub struct WsSubsystem {
	config: WsConfig,
	broker: Broker,
	server: ServerState,
	runtime: SharedRuntime,
	permits: Arc<Semaphore>,
	shutdown: Option<watch::Sender<bool>>,
	accept_task: Option<JoinHandle<()>>,
}

impl WsSubsystem {
	pub fn new(config: WsConfig, broker: Broker, runtime: SharedRuntime) -> Self {
		let permits = Arc::new(Semaphore::new(config.max_connections));
		Self {
			config,
			broker,
			server: ServerState::new(),
			runtime,
			permits,
			shutdown: None,
			accept_task: None,
		}
	}

	pub fn bind_addr(&self) -> &str {
		&self.config.bind_addr
	}

	pub fn local_addr(&self) -> Option<SocketAddr> {
		self.server.local_addr()
	}

	pub fn port(&self) -> Option<u16> {
		self.local_addr().map(|addr| addr.port())
	}

	/// Connections currently being served.
	pub fn active_connections(&self) -> usize {
		self.config.max_connections.saturating_sub(self.permits.available_permits())
	}

	/// Wait until every connection has given its permit back, or `drain_timeout` passes.
	async fn drain(permits: Arc<Semaphore>, max_connections: usize, drain_timeout: Duration) {
		let all = u32::try_from(max_connections).unwrap_or(u32::MAX);
		match timeout(drain_timeout, permits.acquire_many(all)).await {
			Ok(_) => tracing::debug!("All WebSocket connections closed"),
			Err(_) => tracing::warn!(
				"WebSocket drain timed out with {} connections still open",
				max_connections.saturating_sub(permits.available_permits())
			),
		}
	}
}

async fn accept_loop(
	listener: TcpListener,
	broker: Broker,
	permits: Arc<Semaphore>,
	server: ServerState,
	mut shutdown: watch::Receiver<bool>,
) {
	server.set_running(true);

	loop {
		let (stream, peer) = tokio::select! {
			biased;

			changed = shutdown.changed() => {
				if changed.is_err() || *shutdown.borrow() {
					break;
				}
				continue;
			}
			accepted = listener.accept() => match accepted {
				Ok(accepted) => accepted,
				Err(err) => {
					tracing::warn!("WebSocket accept failed: {}", err);
					continue;
				}
			},
		};

		let Ok(permit) = permits.clone().try_acquire_owned() else {
			tracing::warn!("Connection limit reached, dropping {}", peer);
			continue;
		};

		tracing::debug!("Accepted WebSocket connection from {}", peer);
		let broker = broker.clone();
		let shutdown = shutdown.clone();
		tokio::spawn(async move {
			handle_connection(stream, broker, shutdown).await;
			drop(permit);
		});
	}

	server.set_running(false);
	tracing::info!("WebSocket server stopped accepting");
}

impl Subsystem for WsSubsystem {
	fn name(&self) -> &'static str {
		"WebSocket"
	}

	fn start(&mut self) -> Result<()> {
		if self.shutdown.is_some() {
			return Ok(());
		}

		let listener = self.server.bind(&self.runtime, self.bind_addr(), "WebSocket")?;
		let (shutdown, signal) = watch::channel(false);

		let task = self.runtime.spawn(accept_loop(
			listener,
			self.broker.clone(),
			self.permits.clone(),
			self.server.clone(),
			signal,
		));

		self.shutdown = Some(shutdown);
		self.accept_task = Some(task);
		Ok(())
	}

	fn shutdown(&mut self) -> Result<()> {
		let Some(shutdown) = self.shutdown.take() else {
			return Ok(());
		};
		// open connections see the same signal and close their sockets
		let _ = shutdown.send(true);

		let accept_task = self.accept_task.take();
		let permits = self.permits.clone();
		let max_connections = self.config.max_connections;
		let drain_timeout = self.config.drain_timeout;

		self.runtime.block_on(async move {
			if let Some(task) = accept_task {
				let _ = task.await;
			}
			Self::drain(permits, max_connections, drain_timeout).await;
		});

		// hand the permits back so a restart can accept again
		self.permits = Arc::new(Semaphore::new(max_connections));
		Ok(())
	}

	fn is_running(&self) -> bool {
		self.server.is_running()
	}

	fn health_status(&self) -> HealthStatus {
		if !self.server.is_running() {
			return self.server.health(self.shutdown.is_some());
		}

		let active = self.active_connections();
		let max = self.config.max_connections;
		if active > max * 9 / 10 {
			HealthStatus::Warning {
				description: format!("High connection count: {}/{}", active, max),
			}
		} else {
			HealthStatus::Healthy
		}
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}
