// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{any::Any, net::SocketAddr};

use murmur_sub_api::{HealthStatus, ServerState, SharedRuntime, Subsystem};
use murmur_type::Result;
use tokio::{net::TcpListener, sync::oneshot};

use crate::{routes::router, state::AppState};

/// Stop request and the signal that the serve task has returned.
struct Stop {
	request: oneshot::Sender<()>,
	finished: oneshot::Receiver<()>,
}

/// Runs the axum router on the shared runtime.
///
/// Stopping releases held long-polls with an empty answer before the listener
/// closes, so no waiter outlives the server.
pub struct HttpSubsystem {
	state: AppState,
	server: ServerState,
	runtime: SharedRuntime,
	stop: Option<Stop>,
}

impl HttpSubsystem {
	pub fn new(state: AppState, runtime: SharedRuntime) -> Self {
		Self {
			state,
			server: ServerState::new(),
			runtime,
			stop: None,
		}
	}

	pub fn bind_addr(&self) -> &str {
		&self.state.config().bind_addr
	}

	/// Address the listener is bound to, once started.
	pub fn local_addr(&self) -> Option<SocketAddr> {
		self.server.local_addr()
	}

	pub fn port(&self) -> Option<u16> {
		self.local_addr().map(|addr| addr.port())
	}

	fn serve(&self, listener: TcpListener) -> Stop {
		let (request, requested) = oneshot::channel::<()>();
		let (done, finished) = oneshot::channel();

		let app = router(self.state.clone());
		let server = self.server.clone();

		self.runtime.spawn(async move {
			server.set_running(true);

			let graceful = async move {
				let _ = requested.await;
				tracing::info!("HTTP server draining");
			};
			if let Err(err) = axum::serve(listener, app).with_graceful_shutdown(graceful).await {
				tracing::error!("HTTP server failed: {}", err);
			}

			server.set_running(false);
			tracing::info!("HTTP server stopped");
			let _ = done.send(());
		});

		Stop {
			request,
			finished,
		}
	}
}

impl Subsystem for HttpSubsystem {
	fn name(&self) -> &'static str {
		"Http"
	}

	fn start(&mut self) -> Result<()> {
		if self.stop.is_some() {
			return Ok(());
		}

		let listener = self.server.bind(&self.runtime, self.bind_addr(), "HTTP")?;
		self.state.reopen();
		self.stop = Some(self.serve(listener));
		Ok(())
	}

	fn shutdown(&mut self) -> Result<()> {
		// release held polls first; graceful shutdown waits for open requests
		self.state.begin_shutdown();

		if let Some(stop) = self.stop.take() {
			let _ = stop.request.send(());
			let _ = self.runtime.block_on(stop.finished);
		}
		Ok(())
	}

	fn is_running(&self) -> bool {
		self.server.is_running()
	}

	fn health_status(&self) -> HealthStatus {
		self.server.health(self.stop.is_some())
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}
