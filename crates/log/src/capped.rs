// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::VecDeque;

use murmur_type::{Message, MessageId};
use parking_lot::RwLock;
use tracing::trace;

use crate::{LogResult, MessageLog};

/// Fixed size in-memory log. Appending to a full log evicts the oldest message.
pub struct CappedLog {
	capacity: usize,
	messages: RwLock<VecDeque<Message>>,
}

impl CappedLog {
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self {
			capacity,
			messages: RwLock::new(VecDeque::with_capacity(capacity)),
		}
	}

	pub fn len(&self) -> usize {
		self.messages.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.messages.read().is_empty()
	}
}

impl Default for CappedLog {
	fn default() -> Self {
		Self::new(crate::DEFAULT_CAPACITY)
	}
}

impl MessageLog for CappedLog {
	fn append(&self, author: &str, body: &str) -> LogResult<Message> {
		let mut messages = self.messages.write();

		// generated under the write lock so ids follow insertion order
		let message = Message::new(MessageId::generate(), author, body);

		if messages.len() == self.capacity {
			if let Some(evicted) = messages.pop_front() {
				trace!("Evicted message {} from capped log", evicted.id);
			}
		}
		messages.push_back(message.clone());

		Ok(message)
	}

	fn recent(&self, limit: usize) -> LogResult<Vec<Message>> {
		let messages = self.messages.read();
		let skip = messages.len().saturating_sub(limit);
		Ok(messages.iter().skip(skip).cloned().collect())
	}

	fn capacity(&self) -> Option<usize> {
		Some(self.capacity)
	}
}
