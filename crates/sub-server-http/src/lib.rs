// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! HTTP long-poll transport for murmur.
//!
//! Serves a [`Broker`](murmur_broker::Broker) over axum. [`HttpSubsystem`] owns
//! the listener and runs on the process wide runtime.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check (no identity required)
//! - `GET /message?cursor=<id>` - Long-poll for messages newer than `cursor`
//! - `POST /message` - Post a message, form encoded `body=<text>`
//! - `GET /messages?limit=<n>` - The newest `n` messages, oldest first
//!
//! Identity is taken from the `x-user` header, which an authenticating proxy in
//! front of the server is expected to set.
//!
//! # Example
//!
//! ```ignore
//! let runtime = SharedRuntime::new(4)?;
//! let state = AppState::new(broker, HttpConfig::default());
//!
//! let mut http = HttpSubsystem::new(state, runtime.clone());
//! http.start()?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod subsystem;

pub use config::HttpConfig;
pub use error::{AppError, ErrorResponse};
pub use handlers::{HealthResponse, HistoryParams, PollParams, PostForm};
pub use routes::router;
pub use state::AppState;
pub use subsystem::HttpSubsystem;
