// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Display, Formatter},
	ops::Deref,
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Longest cursor value accepted from a client.
pub const MAX_CURSOR_LEN: usize = 128;

/// Opaque, globally unique message identifier.
///
/// Generated identifiers are UUIDv7 values in simple (hex) form, so they sort
/// in generation order within a process.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn generate() -> Self {
		Self(Uuid::now_v7().simple().to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for MessageId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Deref for MessageId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<&str> for MessageId {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl From<String> for MessageId {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// A stored chat message. Immutable once appended to a log.
///
/// Serialises as `{"_id": .., "from": .., "body": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	#[serde(rename = "_id")]
	pub id: MessageId,
	#[serde(rename = "from")]
	pub author: String,
	pub body: String,
}

impl Message {
	pub fn new(id: MessageId, author: impl Into<String>, body: impl Into<String>) -> Self {
		Self {
			id,
			author: author.into(),
			body: body.into(),
		}
	}
}

/// Client supplied marker of the last message already seen.
///
/// An empty cursor means "wait for the next message".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor(Option<MessageId>);

impl Cursor {
	pub fn empty() -> Self {
		Self(None)
	}

	pub fn at(id: MessageId) -> Self {
		Self(Some(id))
	}

	/// Parse a raw cursor from a request. Absent and blank values yield the empty cursor.
	pub fn parse(raw: Option<&str>) -> Result<Self> {
		let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
			return Ok(Self(None));
		};

		if raw.len() > MAX_CURSOR_LEN {
			return Err(Error::BadInput(format!("cursor longer than {} bytes", MAX_CURSOR_LEN)));
		}

		if raw.chars().any(char::is_control) {
			return Err(Error::BadInput("cursor contains control characters".to_string()));
		}

		Ok(Self(Some(MessageId::new(raw))))
	}

	pub fn id(&self) -> Option<&MessageId> {
		self.0.as_ref()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_none()
	}

	/// Move the cursor to the last of `messages`; no-op for an empty slice.
	pub fn advance(&mut self, messages: &[Message]) {
		if let Some(last) = messages.last() {
			self.0 = Some(last.id.clone());
		}
	}
}

impl From<MessageId> for Cursor {
	fn from(id: MessageId) -> Self {
		Self::at(id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_message_wire_shape() {
		let message = Message::new(MessageId::new("A"), "alice", "hi");
		let json = serde_json::to_string(&message).unwrap();
		assert_eq!(json, r#"{"_id":"A","from":"alice","body":"hi"}"#);

		let decoded: Message = serde_json::from_str(&json).unwrap();
		assert_eq!(decoded, message);
	}

	#[test]
	fn test_generated_ids_are_unique_and_ordered() {
		let ids: Vec<MessageId> = (0..100).map(|_| MessageId::generate()).collect();
		for pair in ids.windows(2) {
			assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
		}
	}

	#[test]
	fn test_cursor_parse_empty() {
		assert!(Cursor::parse(None).unwrap().is_empty());
		assert!(Cursor::parse(Some("")).unwrap().is_empty());
		assert!(Cursor::parse(Some("   ")).unwrap().is_empty());
	}

	#[test]
	fn test_cursor_parse_value() {
		let cursor = Cursor::parse(Some("abc")).unwrap();
		assert_eq!(cursor.id(), Some(&MessageId::new("abc")));
	}

	#[test]
	fn test_cursor_parse_rejects_malformed() {
		let too_long = "x".repeat(MAX_CURSOR_LEN + 1);
		assert!(matches!(Cursor::parse(Some(&too_long)), Err(Error::BadInput(_))));
		assert!(matches!(Cursor::parse(Some("a\u{0}b")), Err(Error::BadInput(_))));
	}

	#[test]
	fn test_cursor_advance() {
		let mut cursor = Cursor::empty();
		cursor.advance(&[]);
		assert!(cursor.is_empty());

		cursor.advance(&[Message::new("A".into(), "a", "1"), Message::new("B".into(), "b", "2")]);
		assert_eq!(cursor.id().map(MessageId::as_str), Some("B"));
	}
}
