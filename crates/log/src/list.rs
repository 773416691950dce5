// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::VecDeque;

use murmur_type::{Message, MessageId};
use parking_lot::Mutex;
use tracing::trace;

use crate::{LogError, LogResult, MessageLog};

/// Key-value list log.
///
/// Every message is stored as a JSON encoded string appended to one named list,
/// the way a key-value store keeps a conversation with push and range reads.
/// Entries are decoded on read, so a corrupt entry surfaces as a codec error.
pub struct ListLog {
	key: String,
	entries: Mutex<VecDeque<String>>,
	/// Keep at most this many entries (trim from the front).
	trim: Option<usize>,
}

impl ListLog {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			entries: Mutex::new(VecDeque::new()),
			trim: None,
		}
	}

	pub fn with_trim(mut self, trim: usize) -> Self {
		self.trim = Some(trim.max(1));
		self
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}
}

impl MessageLog for ListLog {
	fn append(&self, author: &str, body: &str) -> LogResult<Message> {
		let mut entries = self.entries.lock();

		let message = Message::new(MessageId::generate(), author, body);
		entries.push_back(serde_json::to_string(&message)?);

		if let Some(trim) = self.trim {
			while entries.len() > trim {
				entries.pop_front();
			}
		}

		trace!("Pushed message {} onto list {}", message.id, self.key);
		Ok(message)
	}

	fn recent(&self, limit: usize) -> LogResult<Vec<Message>> {
		let tail: Vec<String> = {
			let entries = self.entries.lock();
			let skip = entries.len().saturating_sub(limit);
			entries.iter().skip(skip).cloned().collect()
		};

		tail.iter().map(|entry| serde_json::from_str::<Message>(entry).map_err(LogError::from)).collect()
	}

	fn capacity(&self) -> Option<usize> {
		self.trim
	}
}
