// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! HTTP error handling and response formatting.
//!
//! Every failure is answered with `{"error": 1, "textStatus": ".."}`, the shape
//! the chat client expects.

use std::fmt::{self, Display, Formatter};

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use murmur_type::{Error, IntoDiagnostic};
use serde::Serialize;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	/// Always `1`.
	pub error: u8,
	#[serde(rename = "textStatus")]
	pub text_status: String,
}

impl ErrorResponse {
	pub fn new(text_status: impl Into<String>) -> Self {
		Self {
			error: 1,
			text_status: text_status.into(),
		}
	}
}

/// Application error type that converts to HTTP responses.
#[derive(Debug)]
pub struct AppError(pub Error);

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self.0 {
			Error::BadInput(_) => StatusCode::BAD_REQUEST,
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::Storage(_) | Error::Delivery(_) | Error::Subsystem(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<Error> for AppError {
	fn from(e: Error) -> Self {
		AppError(e)
	}
}

impl Display for AppError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		let status = self.status();
		let body = Json(ErrorResponse::new(self.0.text_status()));

		if status.is_server_error() {
			let diagnostic = self.0.into_diagnostic();
			tracing::error!(code = %diagnostic.code, "{}", diagnostic.message);
		} else {
			tracing::debug!("Rejected request: {}", self.0);
		}

		(status, body).into_response()
	}
}
