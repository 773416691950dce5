// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{future::Future, sync::Arc};

use murmur_type::{Error, Result};
use tokio::{
	runtime::{self, Handle, Runtime},
	task::JoinHandle,
};

/// Multi-threaded tokio runtime shared by all subsystems.
///
/// Cloning is cheap; the runtime shuts down when the last clone is dropped.
#[derive(Clone)]
pub struct SharedRuntime {
	inner: Arc<Runtime>,
}

impl SharedRuntime {
	pub fn new(worker_threads: usize) -> Result<Self> {
		let runtime = runtime::Builder::new_multi_thread()
			.worker_threads(worker_threads.max(1))
			.thread_name("murmur-worker")
			.enable_all()
			.build()
			.map_err(|e| Error::Subsystem(format!("failed to build runtime: {}", e)))?;

		Ok(Self {
			inner: Arc::new(runtime),
		})
	}

	pub fn handle(&self) -> Handle {
		self.inner.handle().clone()
	}

	/// Block the calling thread on `future`. Must not be called from inside the runtime.
	pub fn block_on<F: Future>(&self, future: F) -> F::Output {
		self.inner.block_on(future)
	}

	pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
	where
		F: Future + Send + 'static,
		F::Output: Send + 'static,
	{
		self.inner.spawn(future)
	}
}
