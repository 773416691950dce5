// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Build the application router.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(handlers::health))
		.route("/message", get(handlers::poll_messages).post(handlers::post_message))
		.route("/messages", get(handlers::history))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}
