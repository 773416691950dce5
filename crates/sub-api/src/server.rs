// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Bookkeeping shared by the network subsystems: binding, bound address and
//! the running flag their accept loops maintain.

use std::{
	net::SocketAddr,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};

use murmur_type::{Error, Result};
use parking_lot::RwLock;
use tokio::net::TcpListener;

use crate::{runtime::SharedRuntime, subsystem::HealthStatus};

#[derive(Default)]
struct Inner {
	local_addr: RwLock<Option<SocketAddr>>,
	running: AtomicBool,
}

/// Cheap to clone; clones observe the same server.
#[derive(Clone, Default)]
pub struct ServerState {
	inner: Arc<Inner>,
}

impl ServerState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bind `addr` on `runtime` and remember the address actually bound.
	pub fn bind(&self, runtime: &SharedRuntime, addr: &str, what: &str) -> Result<TcpListener> {
		let listener = runtime
			.block_on(TcpListener::bind(addr))
			.map_err(|e| Error::Subsystem(format!("failed to bind {} server to {}: {}", what, addr, e)))?;

		let bound = listener
			.local_addr()
			.map_err(|e| Error::Subsystem(format!("{} server address unavailable: {}", what, e)))?;
		*self.inner.local_addr.write() = Some(bound);

		tracing::info!("{} server bound to {}", what, bound);
		Ok(listener)
	}

	pub fn local_addr(&self) -> Option<SocketAddr> {
		*self.inner.local_addr.read()
	}

	pub fn set_running(&self, running: bool) {
		self.inner.running.store(running, Ordering::SeqCst);
	}

	pub fn is_running(&self) -> bool {
		self.inner.running.load(Ordering::SeqCst)
	}

	/// Health of a server whose accept loop may not have started yet.
	pub fn health(&self, started: bool) -> HealthStatus {
		match (self.is_running(), started) {
			(true, _) => HealthStatus::Healthy,
			(false, true) => HealthStatus::Warning {
				description: "Starting up".to_string(),
			},
			(false, false) => HealthStatus::Failed {
				description: "Not running".to_string(),
			},
		}
	}
}
