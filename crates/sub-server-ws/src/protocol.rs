// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! WebSocket frame types for the protocol layer.

use murmur_type::Error;
use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::Message as Frame;

/// Client request to post a message.
#[derive(Debug, Serialize, Deserialize)]
pub struct PostRequest {
	pub body: String,
}

impl PostRequest {
	pub fn parse(text: &str) -> Result<Self, Error> {
		serde_json::from_str(text).map_err(|e| Error::BadInput(e.to_string()))
	}
}

/// `{"error": 1, "textStatus": ".."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorFrame {
	pub error: u8,
	#[serde(rename = "textStatus")]
	pub text_status: String,
}

impl From<&Error> for ErrorFrame {
	fn from(err: &Error) -> Self {
		Self {
			error: 1,
			text_status: err.text_status(),
		}
	}
}

/// Serialise `value` into a text frame.
pub fn encode<T: Serialize>(value: &T) -> serde_json::Result<Frame> {
	serde_json::to_string(value).map(Frame::text)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_post_request() {
		assert_eq!(PostRequest::parse(r#"{"body": "hi"}"#).unwrap().body, "hi");
		assert!(matches!(PostRequest::parse("hi"), Err(Error::BadInput(_))));
		assert!(matches!(PostRequest::parse(r#"{"text": "hi"}"#), Err(Error::BadInput(_))));
	}

	#[test]
	fn test_error_frame() {
		let frame = ErrorFrame::from(&Error::BadInput("message body is empty".to_string()));
		assert_eq!(
			serde_json::to_string(&frame).unwrap(),
			r#"{"error":1,"textStatus":"Bad input data: message body is empty"}"#
		);
	}
}
