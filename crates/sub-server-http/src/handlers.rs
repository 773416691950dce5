// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! HTTP endpoint handlers.
//!
//! This module provides the request handlers for:
//! - `/health` - Health check endpoint
//! - `/message` - Long-poll (`GET`) and post (`POST`)
//! - `/messages` - Recent history

use axum::{
	Json,
	extract::{Form, Query, State, rejection::FormRejection},
	http::{HeaderMap, StatusCode},
	response::IntoResponse,
};
use murmur_broker::{Delivery, WaitOutcome};
use murmur_type::{Cursor, Error, Message, body::sanitize};
use serde::{Deserialize, Serialize};

use crate::{config::MAX_HISTORY_LIMIT, error::AppError, state::AppState};

/// Header carrying the authenticated user name, set by the auth proxy.
pub const IDENTITY_HEADER: &str = "x-user";

/// Query string of `GET /message`.
#[derive(Debug, Default, Deserialize)]
pub struct PollParams {
	pub cursor: Option<String>,
}

/// Form body of `POST /message`.
#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
	#[serde(default)]
	pub body: String,
}

/// Query string of `GET /messages`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
	pub limit: Option<usize>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub waiters: usize,
}

/// Health check endpoint.
///
/// Returns 200 OK if the server is running.
/// This endpoint does not require an identity.
///
/// # Response
///
/// ```json
/// {"status": "ok", "waiters": 3}
/// ```
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
	(
		StatusCode::OK,
		Json(HealthResponse {
			status: "ok",
			waiters: state.broker().waiter_count(),
		}),
	)
}

/// Long-poll for messages newer than `cursor`.
///
/// Answers at once when the cursor is behind the log, otherwise holds the
/// request until the next post or until the broker's `max_wait` elapses.
/// A timed out poll, or one released by server shutdown, answers with an
/// empty `messages` array.
///
/// # Response
///
/// ```json
/// {"messages": [{"_id": "..", "from": "alice", "body": "hi"}]}
/// ```
pub async fn poll_messages(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(params): Query<PollParams>,
) -> Result<Json<Delivery>, AppError> {
	let user = extract_identity(&headers)?;
	let cursor = Cursor::parse(params.cursor.as_deref())?;
	tracing::trace!("{} polling from {:?}", user, cursor.id());

	let outcome = tokio::select! {
		outcome = state.broker().wait(cursor) => outcome?,
		_ = state.closed() => WaitOutcome::TimedOut,
	};

	let messages = match outcome {
		WaitOutcome::Messages(messages) => messages,
		WaitOutcome::TimedOut => Vec::new(),
	};

	Ok(Json(Delivery::new(messages)))
}

/// Post a new message as the calling user.
///
/// # Request Body
///
/// `application/x-www-form-urlencoded`: `body=<text>`
///
/// # Response
///
/// The stored message:
///
/// ```json
/// {"_id": "..", "from": "alice", "body": "hi"}
/// ```
pub async fn post_message(
	State(state): State<AppState>,
	headers: HeaderMap,
	form: Result<Form<PostForm>, FormRejection>,
) -> Result<Json<Message>, AppError> {
	let user = extract_identity(&headers)?;
	let Form(form) = form.map_err(|e| Error::BadInput(e.body_text()))?;

	let body = sanitize(&form.body)?;
	let message = state.broker().post_offloaded(user, body).await?;

	Ok(Json(message))
}

/// The newest messages, oldest first.
pub async fn history(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(params): Query<HistoryParams>,
) -> Result<Json<Delivery>, AppError> {
	extract_identity(&headers)?;

	let limit = params.limit.unwrap_or(state.config().history_limit).min(MAX_HISTORY_LIMIT);
	let messages = state.broker().history_offloaded(limit).await?;

	Ok(Json(Delivery::new(messages)))
}

/// Extract the caller's user name from the identity header.
fn extract_identity(headers: &HeaderMap) -> Result<String, AppError> {
	let user = headers
		.get(IDENTITY_HEADER)
		.and_then(|value| value.to_str().ok())
		.map(str::trim)
		.filter(|user| !user.is_empty())
		.ok_or(Error::Unauthorized)?;

	Ok(user.to_string())
}
