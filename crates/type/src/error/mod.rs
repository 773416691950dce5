// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod diagnostic;

/// Error kinds surfaced by the notification core.
///
/// Every error is scoped to a single request or a single waiter; none is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// Malformed post body or cursor. Rejected before any state is touched.
	#[error("Bad input data: {0}")]
	BadInput(String),

	/// Missing or rejected identity. Produced by the transport's auth collaborator.
	#[error("unauthorized")]
	Unauthorized,

	/// The message log is unavailable or a write failed.
	#[error("Error accessing database: {0}")]
	Storage(String),

	/// A single waiter's delivery channel was gone at notify time.
	#[error("Delivery failed: {0}")]
	Delivery(String),

	/// A server subsystem could not start, e.g. its listener failed to bind.
	#[error("Subsystem error: {0}")]
	Subsystem(String),
}

impl Error {
	/// Value of the `textStatus` field in the `{"error": 1, "textStatus": ..}` wire shape.
	pub fn text_status(&self) -> String {
		self.to_string()
	}

	pub fn is_client_error(&self) -> bool {
		matches!(self, Error::BadInput(_) | Error::Unauthorized)
	}
}

pub type Result<T> = std::result::Result<T, Error>;
