// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Delivery channels: the per-connection sinks waiters are resolved into.

use murmur_type::Message;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

/// Payload handed to a waiter, serialised as `{"messages": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
	pub messages: Vec<Message>,
}

impl Delivery {
	pub fn new(messages: Vec<Message>) -> Self {
		Self {
			messages,
		}
	}

	pub fn single(message: Message) -> Self {
		Self {
			messages: vec![message],
		}
	}
}

/// Result of attempting to resolve a delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryResult {
	/// Delivery was handed to the consumer.
	Delivered,
	/// Consumer is not keeping up (e.g. channel full); the delivery was dropped.
	BackPressure,
	/// Consumer has disconnected.
	Disconnected,
}

/// Transport specific sink for one waiter.
///
/// Implementations handle the protocol details of getting a [`Delivery`] to a
/// client, e.g. completing a held HTTP response or writing to a socket.
pub trait DeliveryChannel: Send {
	/// Whether the consumer is known to be gone. Advisory: a closed channel may
	/// still report `false`, in which case [`resolve`](Self::resolve) fails.
	fn is_closed(&self) -> bool;

	/// Deliver to the consumer. Takes `self` by value so a channel resolves at most once.
	fn resolve(self: Box<Self>, delivery: Delivery) -> DeliveryResult;
}

/// Single shot channel completing one held request.
pub struct OneshotChannel {
	tx: oneshot::Sender<Delivery>,
}

pub fn oneshot_channel() -> (OneshotChannel, oneshot::Receiver<Delivery>) {
	let (tx, rx) = oneshot::channel();
	(
		OneshotChannel {
			tx,
		},
		rx,
	)
}

impl DeliveryChannel for OneshotChannel {
	fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}

	fn resolve(self: Box<Self>, delivery: Delivery) -> DeliveryResult {
		match self.tx.send(delivery) {
			Ok(()) => DeliveryResult::Delivered,
			Err(_) => DeliveryResult::Disconnected,
		}
	}
}

/// Channel feeding a persistent connection's outbound queue.
#[derive(Clone)]
pub struct PushChannel {
	tx: mpsc::Sender<Delivery>,
}

pub fn push_channel(buffer: usize) -> (PushChannel, mpsc::Receiver<Delivery>) {
	let (tx, rx) = mpsc::channel(buffer.max(1));
	(
		PushChannel {
			tx,
		},
		rx,
	)
}

impl DeliveryChannel for PushChannel {
	fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}

	fn resolve(self: Box<Self>, delivery: Delivery) -> DeliveryResult {
		match self.tx.try_send(delivery) {
			Ok(()) => DeliveryResult::Delivered,
			Err(mpsc::error::TrySendError::Full(_)) => DeliveryResult::BackPressure,
			Err(mpsc::error::TrySendError::Closed(_)) => DeliveryResult::Disconnected,
		}
	}
}
