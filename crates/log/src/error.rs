// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Message log error types.

use std::fmt::Display;

/// Error type for message log operations.
#[derive(Debug, Clone)]
pub enum LogError {
	/// The backing store failed.
	Internal(String),
	/// A stored entry could not be encoded or decoded.
	Codec(String),
}

impl Display for LogError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			LogError::Internal(msg) => write!(f, "message log internal error: {}", msg),
			LogError::Codec(msg) => write!(f, "message log codec error: {}", msg),
		}
	}
}

impl std::error::Error for LogError {}

impl From<LogError> for murmur_type::Error {
	fn from(err: LogError) -> Self {
		murmur_type::Error::Storage(err.to_string())
	}
}

impl From<rusqlite::Error> for LogError {
	fn from(err: rusqlite::Error) -> Self {
		LogError::Internal(err.to_string())
	}
}

impl From<serde_json::Error> for LogError {
	fn from(err: serde_json::Error) -> Self {
		LogError::Codec(err.to_string())
	}
}

/// Result type for message log operations.
pub type LogResult<T> = Result<T, LogError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_into_storage_error() {
		let err: murmur_type::Error = LogError::Internal("disk full".to_string()).into();
		assert_eq!(err, murmur_type::Error::Storage("message log internal error: disk full".to_string()));
	}
}
