// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use murmur_broker::{Broker, BrokerConfig};
use murmur_log::CappedLog;
use murmur_sub_api::{SharedRuntime, Subsystem};
use murmur_sub_server_ws::{WsConfig, WsSubsystem};
use murmur_testing::wait_for;
use serde_json::{Value, json};
use tokio::{net::TcpStream, time::timeout};
use tokio_tungstenite::{
	MaybeTlsStream, WebSocketStream, connect_async,
	tungstenite::{Error as WsError, Message as Frame, client::IntoClientRequest, http::HeaderValue},
};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct Harness {
	runtime: SharedRuntime,
	broker: Broker,
	ws: WsSubsystem,
}

impl Harness {
	fn start() -> Self {
		let runtime = SharedRuntime::new(2).unwrap();
		let broker = Broker::new(Arc::new(CappedLog::default()), BrokerConfig::default());
		let config = WsConfig::new("127.0.0.1:0").with_drain_timeout(Duration::from_secs(5));

		let mut ws = WsSubsystem::new(config, broker.clone(), runtime.clone());
		ws.start().unwrap();

		Self {
			runtime,
			broker,
			ws,
		}
	}

	fn addr(&self) -> SocketAddr {
		self.ws.local_addr().unwrap()
	}
}

impl Drop for Harness {
	fn drop(&mut self) {
		self.ws.shutdown().unwrap();
	}
}

async fn connect(addr: SocketAddr, user: &'static str) -> Client {
	let mut request = format!("ws://{}", addr).into_client_request().unwrap();
	request.headers_mut().insert("x-user", HeaderValue::from_static(user));
	let (client, _) = connect_async(request).await.unwrap();
	client
}

async fn next_json(client: &mut Client) -> Value {
	loop {
		let frame = timeout(Duration::from_secs(5), client.next()).await.unwrap().unwrap().unwrap();
		if let Frame::Text(text) = frame {
			return serde_json::from_str(text.as_str()).unwrap();
		}
	}
}

async fn send_json(client: &mut Client, value: Value) {
	client.send(Frame::text(value.to_string())).await.unwrap();
}

#[test]
fn test_handshake_without_identity_is_rejected() {
	let harness = Harness::start();
	let addr = harness.addr();

	harness.runtime.block_on(async {
		let err = connect_async(format!("ws://{}", addr)).await.unwrap_err();
		let WsError::Http(response) = err else {
			panic!("expected an HTTP rejection, got {err:?}");
		};
		assert_eq!(response.status(), 401);
	});
}

#[test]
fn test_post_is_acknowledged_and_pushed_to_everyone() {
	let harness = Harness::start();
	let addr = harness.addr();
	let broker = harness.broker.clone();

	harness.runtime.block_on(async {
		let mut alice = connect(addr, "alice").await;
		let mut bob = connect(addr, "bob").await;
		wait_for(|| broker.waiter_count() == 2, "both sockets should be waiting").await;

		send_json(&mut bob, json!({ "body": "hi <all>" })).await;

		let ack = next_json(&mut bob).await;
		assert_eq!(ack["from"], "bob");
		assert_eq!(ack["body"], "hi &lt;all&gt;");

		assert_eq!(next_json(&mut bob).await, json!({ "messages": [ack.clone()] }));
		assert_eq!(next_json(&mut alice).await, json!({ "messages": [ack] }));
	});
}

#[test]
fn test_consecutive_posts_are_not_skipped() {
	let harness = Harness::start();
	let addr = harness.addr();
	let broker = harness.broker.clone();

	harness.runtime.block_on(async {
		let mut alice = connect(addr, "alice").await;
		wait_for(|| broker.waiter_count() == 1, "socket should be waiting").await;

		let posted: Vec<_> = (0..5).map(|i| broker.post("bob", &format!("m{i}")).unwrap()).collect();

		let mut received = Vec::new();
		while received.len() < posted.len() {
			let push = next_json(&mut alice).await;
			received.extend(push["messages"].as_array().unwrap().iter().map(|m| m["body"].clone()));
		}
		assert_eq!(received, posted.iter().map(|m| json!(m.body)).collect::<Vec<_>>());
	});
}

#[test]
fn test_malformed_frame_gets_error_reply() {
	let harness = Harness::start();
	let addr = harness.addr();

	harness.runtime.block_on(async {
		let mut alice = connect(addr, "alice").await;

		alice.send(Frame::text("not json".to_string())).await.unwrap();
		let reply = next_json(&mut alice).await;
		assert_eq!(reply["error"], 1);
		assert!(reply["textStatus"].as_str().unwrap().starts_with("Bad input data"));

		send_json(&mut alice, json!({ "body": "   " })).await;
		assert_eq!(
			next_json(&mut alice).await,
			json!({ "error": 1, "textStatus": "Bad input data: message body is empty" })
		);
	});
}

#[test]
fn test_disconnect_removes_waiter() {
	let harness = Harness::start();
	let addr = harness.addr();
	let broker = harness.broker.clone();

	harness.runtime.block_on(async {
		let mut alice = connect(addr, "alice").await;
		wait_for(|| broker.waiter_count() == 1, "socket should be waiting").await;

		alice.close(None).await.unwrap();
		wait_for(|| broker.waiter_count() == 0, "closed socket should stop waiting").await;
	});
}

#[test]
fn test_active_connections_follow_open_sockets() {
	let harness = Harness::start();
	let addr = harness.addr();
	let ws = &harness.ws;
	assert_eq!(ws.active_connections(), 0);

	harness.runtime.block_on(async {
		let mut alice = connect(addr, "alice").await;
		let bob = connect(addr, "bob").await;
		wait_for(|| ws.active_connections() == 2, "both sockets should be counted").await;

		alice.close(None).await.unwrap();
		wait_for(|| ws.active_connections() == 1, "closed socket should release its slot").await;
		drop(bob);
	});
}
