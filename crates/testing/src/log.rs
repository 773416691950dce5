// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! A message log whose storage can be switched off.

use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};

use murmur_log::{CappedLog, LogError, LogResult, MessageLog};
use murmur_type::Message;

/// Wraps another log and fails every operation while `failing` is set.
pub struct FailingLog {
	inner: Arc<dyn MessageLog>,
	failing: AtomicBool,
}

impl FailingLog {
	pub fn new(inner: Arc<dyn MessageLog>) -> Self {
		Self {
			inner,
			failing: AtomicBool::new(false),
		}
	}

	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}

	fn check(&self) -> LogResult<()> {
		if self.failing.load(Ordering::SeqCst) {
			return Err(LogError::Internal("storage unavailable".to_string()));
		}
		Ok(())
	}
}

impl Default for FailingLog {
	fn default() -> Self {
		Self::new(Arc::new(CappedLog::default()))
	}
}

impl MessageLog for FailingLog {
	fn append(&self, author: &str, body: &str) -> LogResult<Message> {
		self.check()?;
		self.inner.append(author, body)
	}

	fn recent(&self, limit: usize) -> LogResult<Vec<Message>> {
		self.check()?;
		self.inner.recent(limit)
	}

	fn capacity(&self) -> Option<usize> {
		self.inner.capacity()
	}
}
