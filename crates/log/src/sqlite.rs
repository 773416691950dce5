// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::Path;

use murmur_type::{Message, MessageId};
use parking_lot::Mutex;
use rusqlite::{Connection, params};
use tracing::debug;

use crate::{LogResult, MessageLog};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS conversation (
	seq    INTEGER PRIMARY KEY AUTOINCREMENT,
	id     TEXT NOT NULL UNIQUE,
	author TEXT NOT NULL,
	body   TEXT NOT NULL
);
";

/// Persistent message log stored in a sqlite `conversation` table.
pub struct SqliteLog {
	conn: Mutex<Connection>,
	capacity: Option<usize>,
}

impl SqliteLog {
	pub fn open(path: impl AsRef<Path>) -> LogResult<Self> {
		let path = path.as_ref();
		let conn = Connection::open(path)?;
		debug!("Opened sqlite message log at {}", path.display());
		Self::with_connection(conn)
	}

	pub fn in_memory() -> LogResult<Self> {
		Self::with_connection(Connection::open_in_memory()?)
	}

	fn with_connection(conn: Connection) -> LogResult<Self> {
		conn.execute_batch(SCHEMA)?;
		Ok(Self {
			conn: Mutex::new(conn),
			capacity: None,
		})
	}

	/// Bound the log: rows older than the newest `capacity` are deleted on append.
	pub fn with_capacity(mut self, capacity: usize) -> Self {
		self.capacity = Some(capacity.max(1));
		self
	}
}

fn to_sql_limit(limit: usize) -> i64 {
	i64::try_from(limit).unwrap_or(i64::MAX)
}

impl MessageLog for SqliteLog {
	fn append(&self, author: &str, body: &str) -> LogResult<Message> {
		let conn = self.conn.lock();

		let message = Message::new(MessageId::generate(), author, body);
		conn.execute(
			"INSERT INTO conversation (id, author, body) VALUES (?1, ?2, ?3)",
			params![message.id.as_str(), message.author, message.body],
		)?;

		if let Some(capacity) = self.capacity {
			let evicted = conn.execute(
				"DELETE FROM conversation WHERE seq NOT IN \
				 (SELECT seq FROM conversation ORDER BY seq DESC LIMIT ?1)",
				params![to_sql_limit(capacity)],
			)?;
			if evicted > 0 {
				debug!("Evicted {} messages from sqlite log", evicted);
			}
		}

		Ok(message)
	}

	fn recent(&self, limit: usize) -> LogResult<Vec<Message>> {
		let conn = self.conn.lock();
		let mut stmt = conn.prepare_cached(
			"SELECT id, author, body FROM \
			 (SELECT seq, id, author, body FROM conversation ORDER BY seq DESC LIMIT ?1) \
			 ORDER BY seq ASC",
		)?;

		let rows = stmt.query_map(params![to_sql_limit(limit)], |row| {
			Ok(Message::new(
				MessageId::new(row.get::<_, String>(0)?),
				row.get::<_, String>(1)?,
				row.get::<_, String>(2)?,
			))
		})?;

		let mut messages = Vec::new();
		for row in rows {
			messages.push(row?);
		}
		Ok(messages)
	}

	fn capacity(&self) -> Option<usize> {
		self.capacity
	}
}
