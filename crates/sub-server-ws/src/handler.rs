// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Per-connection loop.
//!
//! Each connection keeps one waiter registered through a push channel. When it
//! is resolved, the messages are sent and the connection's cursor moves to the
//! last of them, so the next poll picks up anything posted in between.

use std::net::SocketAddr;

use futures_util::{Sink, SinkExt, StreamExt, stream::SplitStream};
use murmur_broker::{Broker, Delivery, Outcome, push_channel};
use murmur_type::{Error, Message, Result, body::sanitize};
use serde::Serialize;
use tokio::{
	net::TcpStream,
	sync::{mpsc, watch},
};
use tokio_tungstenite::{
	WebSocketStream, accept_hdr_async,
	tungstenite::{
		self, Message as Frame,
		handshake::server::{ErrorResponse, Request, Response},
		http::StatusCode,
	},
};

use crate::protocol::{ErrorFrame, PostRequest, encode};

/// Handshake header carrying the authenticated user name.
pub const IDENTITY_HEADER: &str = "x-user";

/// Deliveries buffered per connection before the broker reports back pressure.
const PUSH_BUFFER: usize = 16;

type Socket = WebSocketStream<TcpStream>;

/// Serve one client until it disconnects or the server shuts down.
pub async fn handle_connection(stream: TcpStream, broker: Broker, mut shutdown: watch::Receiver<bool>) {
	let peer = stream.peer_addr().ok();

	let Some((socket, user)) = accept(stream, peer).await else {
		return;
	};
	tracing::debug!("{} connected from {:?}", user, peer);

	if let Err(e) = serve(socket, &broker, &user, &mut shutdown).await {
		tracing::debug!("Connection of {} ended: {}", user, e);
	}
	tracing::debug!("{} disconnected", user);
}

async fn accept(stream: TcpStream, peer: Option<SocketAddr>) -> Option<(Socket, String)> {
	let mut user = None;

	let handshake = accept_hdr_async(stream, |request: &Request, response: Response| {
		match identity(request) {
			Some(name) => {
				user = Some(name);
				Ok(response)
			}
			None => Err(unauthorized()),
		}
	})
	.await;

	match (handshake, user) {
		(Ok(socket), Some(user)) => Some((socket, user)),
		(Ok(_), None) => None,
		(Err(e), _) => {
			tracing::debug!("WebSocket handshake with {:?} failed: {}", peer, e);
			None
		}
	}
}

fn identity(request: &Request) -> Option<String> {
	request
		.headers()
		.get(IDENTITY_HEADER)
		.and_then(|value| value.to_str().ok())
		.map(str::trim)
		.filter(|user| !user.is_empty())
		.map(str::to_string)
}

fn unauthorized() -> ErrorResponse {
	let body = serde_json::to_string(&ErrorFrame::from(&Error::Unauthorized)).ok();
	let mut response = ErrorResponse::new(body);
	*response.status_mut() = StatusCode::UNAUTHORIZED;
	response
}

async fn serve(
	socket: Socket,
	broker: &Broker,
	user: &str,
	shutdown: &mut watch::Receiver<bool>,
) -> std::result::Result<(), tungstenite::Error> {
	let (mut sink, mut source) = socket.split();
	let (channel, mut pushed) = push_channel(PUSH_BUFFER);

	let mut cursor = match broker.latest_cursor() {
		Ok(cursor) => cursor,
		Err(e) => {
			send(&mut sink, &ErrorFrame::from(&e)).await?;
			return sink.close().await;
		}
	};

	loop {
		let waiter = match broker.poll(&cursor, Box::new(channel.clone())) {
			Ok(Outcome::Ready(messages)) => {
				cursor.advance(&messages);
				send(&mut sink, &Delivery::new(messages)).await?;
				continue;
			}
			Ok(Outcome::Pending(waiter)) => waiter,
			Err(e) => {
				send(&mut sink, &ErrorFrame::from(&e)).await?;
				break;
			}
		};

		let result = wait_for_push(broker, user, &mut pushed, &mut sink, &mut source, shutdown).await;
		match result {
			Ok(Some(delivery)) => {
				cursor.advance(&delivery.messages);
				send(&mut sink, &delivery).await?;
			}
			Ok(None) => {
				broker.remove_waiter(waiter);
				break;
			}
			Err(e) => {
				broker.remove_waiter(waiter);
				return Err(e);
			}
		}
	}

	sink.close().await
}

/// Serve client frames until the pending waiter is resolved.
///
/// `None` means the connection is closing.
async fn wait_for_push<S>(
	broker: &Broker,
	user: &str,
	pushed: &mut mpsc::Receiver<Delivery>,
	sink: &mut S,
	source: &mut SplitStream<Socket>,
	shutdown: &mut watch::Receiver<bool>,
) -> std::result::Result<Option<Delivery>, tungstenite::Error>
where
	S: Sink<Frame, Error = tungstenite::Error> + Unpin,
{
	loop {
		tokio::select! {
			delivery = pushed.recv() => return Ok(delivery),

			frame = source.next() => match frame {
				Some(Ok(Frame::Text(text))) => match post(broker, user, text.as_str()).await {
					Ok(message) => send(sink, &message).await?,
					Err(e) => send(sink, &ErrorFrame::from(&e)).await?,
				},
				Some(Ok(Frame::Binary(_))) => {
					let e = Error::BadInput("binary frames are not supported".to_string());
					send(sink, &ErrorFrame::from(&e)).await?;
				}
				Some(Ok(Frame::Close(_))) | None => return Ok(None),
				Some(Ok(_)) => {}
				Some(Err(e)) => return Err(e),
			},

			changed = shutdown.changed() => {
				if changed.is_err() || *shutdown.borrow() {
					return Ok(None);
				}
			}
		}
	}
}

async fn post(broker: &Broker, user: &str, text: &str) -> Result<Message> {
	let request = PostRequest::parse(text)?;
	let body = sanitize(&request.body)?;
	broker.post_offloaded(user.to_string(), body).await
}

async fn send<S, T>(sink: &mut S, value: &T) -> std::result::Result<(), tungstenite::Error>
where
	S: Sink<Frame, Error = tungstenite::Error> + Unpin,
	T: Serialize,
{
	match encode(value) {
		Ok(frame) => sink.send(frame).await,
		Err(e) => {
			tracing::error!("Failed to encode frame: {}", e);
			Ok(())
		}
	}
}
