// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Append-only message logs.
//!
//! The notification broker only needs two things from storage: append a message
//! and read the newest messages in insertion order. This crate defines that
//! contract as [`MessageLog`] and ships three adapters:
//!
//! - [`CappedLog`] - fixed size, oldest evicted first (capped document collection)
//! - [`ListLog`] - JSON encoded entries in a single list (key-value list store)
//! - [`SqliteLog`] - persistent log backed by sqlite

pub mod capped;
pub mod error;
pub mod list;
pub mod sqlite;

pub use capped::CappedLog;
pub use error::{LogError, LogResult};
pub use list::ListLog;
use murmur_type::Message;
pub use sqlite::SqliteLog;

/// Capacity of a capped conversation, matching the size of the initial history page.
pub const DEFAULT_CAPACITY: usize = 50;

/// Abstract append-only message sequence with a fixed natural order.
pub trait MessageLog: Send + Sync {
	/// Allocate a new id, store the message as the newest element and return it.
	///
	/// The id is generated here, before the store write, so callers know it
	/// before any downstream publish step.
	fn append(&self, author: &str, body: &str) -> LogResult<Message>;

	/// Up to `limit` most recent messages, oldest first.
	fn recent(&self, limit: usize) -> LogResult<Vec<Message>>;

	/// Maximum number of retained messages, if the log is bounded.
	fn capacity(&self) -> Option<usize> {
		None
	}
}
