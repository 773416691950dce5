// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Cursor diff: what is new since the message a client saw last.

use murmur_type::{Message, MessageId};

/// Messages strictly after the one identified by `cursor`.
///
/// Scans backward from the newest message, since clients usually poll with a
/// recent cursor. Returns `None` when the cursor is not in `messages`, e.g.
/// because it aged out of a capped log or was never issued.
pub fn messages_after<'a>(messages: &'a [Message], cursor: &MessageId) -> Option<&'a [Message]> {
	messages.iter().rposition(|message| &message.id == cursor).map(|idx| &messages[idx + 1..])
}

#[cfg(test)]
mod tests {
	use super::*;

	fn log(ids: &[&str]) -> Vec<Message> {
		ids.iter().map(|id| Message::new(MessageId::new(*id), "alice", *id)).collect()
	}

	#[test]
	fn test_suffix_after_cursor() {
		let messages = log(&["A", "B", "C", "D"]);
		let after = messages_after(&messages, &MessageId::new("B")).unwrap();
		assert_eq!(after, &messages[2..]);
	}

	#[test]
	fn test_cursor_at_newest_is_empty() {
		let messages = log(&["A", "B"]);
		assert!(messages_after(&messages, &MessageId::new("B")).unwrap().is_empty());
	}

	#[test]
	fn test_unknown_cursor() {
		let messages = log(&["A", "B"]);
		assert!(messages_after(&messages, &MessageId::new("Z")).is_none());
		assert!(messages_after(&[], &MessageId::new("A")).is_none());
	}
}
