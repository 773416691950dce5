// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! WebSocket push transport for murmur.
//!
//! Each socket keeps one pending waiter in the [`Broker`](murmur_broker::Broker)
//! and receives every new message as it is posted. The user name comes from the
//! `x-user` handshake header; a handshake without it is refused with 401.
//! [`WsSubsystem`] caps concurrent sockets and drains them on shutdown.
//!
//! # Message Protocol
//!
//! Client to server, post a message:
//!
//! ```json
//! {"body": "hello"}
//! ```
//!
//! Server to client, the acknowledged message:
//!
//! ```json
//! {"_id": "..", "from": "alice", "body": "hello"}
//! ```
//!
//! Server to client, new messages:
//!
//! ```json
//! {"messages": [{"_id": "..", "from": "alice", "body": "hello"}]}
//! ```
//!
//! Failures are answered with `{"error": 1, "textStatus": ".."}`.

pub mod config;
pub mod handler;
pub mod protocol;
pub mod subsystem;

pub use config::WsConfig;
pub use handler::handle_connection;
pub use protocol::{ErrorFrame, PostRequest};
pub use subsystem::WsSubsystem;
