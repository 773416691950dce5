// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

use super::Error;

/// Structured description of an error, suitable for logs and admin tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub code: String,
	pub message: String,
	pub help: Option<String>,
	pub notes: Vec<String>,
}

pub trait IntoDiagnostic {
	fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Error {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			Error::BadInput(reason) => bad_input(reason),
			Error::Unauthorized => unauthorized(),
			Error::Storage(msg) => storage_error(msg),
			Error::Delivery(msg) => delivery_failed(msg),
			Error::Subsystem(msg) => subsystem_failed(msg),
		}
	}
}

/// Post body or cursor could not be accepted
pub fn bad_input(reason: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "INPUT_001".to_string(),
		message: format!("Bad input data: {}", reason.into()),
		help: Some("Send a non-empty `body` and a cursor taken from a previously received message".to_string()),
		notes: vec![],
	}
}

/// Request carried no identity
pub fn unauthorized() -> Diagnostic {
	Diagnostic {
		code: "AUTH_001".to_string(),
		message: "unauthorized".to_string(),
		help: Some("Log in before polling or posting messages".to_string()),
		notes: vec![],
	}
}

/// Message log access failed
pub fn storage_error(msg: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "STORAGE_001".to_string(),
		message: format!("Error accessing database: {}", msg.into()),
		help: Some("Check message log configuration and availability".to_string()),
		notes: vec!["Pending waiters are not affected by storage failures".to_string()],
	}
}

/// Delivery to one waiter failed
pub fn delivery_failed(msg: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "DELIVERY_001".to_string(),
		message: format!("Delivery failed: {}", msg.into()),
		help: None,
		notes: vec!["The client most likely disconnected before the message arrived".to_string()],
	}
}

pub fn subsystem_failed(msg: impl Into<String>) -> Diagnostic {
	Diagnostic {
		code: "SUBSYSTEM_001".to_string(),
		message: format!("Subsystem error: {}", msg.into()),
		help: Some("Check that the configured address is free and reachable".to_string()),
		notes: vec![],
	}
}
