// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The notification broker.
//!
//! Control flow for one client:
//!
//! 1. `poll(cursor)` reads the newest messages from the log
//! 2. anything after the cursor is returned right away as [`Outcome::Ready`]
//! 3. otherwise the client's channel is registered as a waiter ([`Outcome::Pending`])
//! 4. the next `post` appends to the log, drains the registry and resolves every
//!    drained waiter with that single new message
//!
//! Every post resets all waiters, whatever their cursor was. A waiter that was
//! far behind therefore receives only the newest message, not its backlog.

use std::sync::Arc;

use murmur_log::MessageLog;
use murmur_type::{Cursor, Error, IntoDiagnostic, Message, Result};
use tokio::{task::spawn_blocking, time::timeout};
use tracing::{debug, error, trace, warn};

use crate::{
	config::BrokerConfig,
	cursor::messages_after,
	delivery::{Delivery, DeliveryChannel, DeliveryResult, oneshot_channel},
	registry::{Registration, WaiterRegistry},
	waiter::WaiterId,
};

/// Answer to a single poll: exactly one of an immediate reply or a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// Messages newer than the cursor, oldest first. Never empty.
	Ready(Vec<Message>),
	/// Nothing new; the channel was registered under this id.
	Pending(WaiterId),
}

/// Result of [`Broker::wait`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
	Messages(Vec<Message>),
	/// `max_wait` elapsed before a message arrived.
	TimedOut,
}

/// Summary of one fan-out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanOut {
	pub delivered: usize,
	pub skipped: usize,
}

struct Inner {
	log: Arc<dyn MessageLog>,
	registry: WaiterRegistry,
	config: BrokerConfig,
}

/// Long-poll notification broker over an abstract message log.
///
/// Cheap to clone; clones share the log and the waiter registry.
#[derive(Clone)]
pub struct Broker {
	inner: Arc<Inner>,
}

impl Broker {
	pub fn new(log: Arc<dyn MessageLog>, config: BrokerConfig) -> Self {
		Self {
			inner: Arc::new(Inner {
				log,
				registry: WaiterRegistry::new(),
				config,
			}),
		}
	}

	pub fn config(&self) -> &BrokerConfig {
		&self.inner.config
	}

	/// Number of currently pending waiters.
	pub fn waiter_count(&self) -> usize {
		self.inner.registry.len()
	}

	/// Answer "what is new since `cursor`?" or register `channel` as a waiter.
	///
	/// The log is read on every poll, so a storage failure reaches the caller
	/// and nothing is registered. After a successful read an empty cursor always
	/// registers. So does a cursor that is not found in the scanned window
	/// (unknown or aged out of a bounded log).
	pub fn poll(&self, cursor: &Cursor, channel: Box<dyn DeliveryChannel>) -> Result<Outcome> {
		let mut channel = channel;

		loop {
			let seen = self.inner.registry.epoch();
			let messages = self.recent(self.window())?;

			if let Some(id) = cursor.id() {
				match messages_after(&messages, id) {
					Some(recent) if !recent.is_empty() => {
						trace!("Cursor {} is {} messages behind", id, recent.len());
						return Ok(Outcome::Ready(recent.to_vec()));
					}
					Some(_) => {}
					None => debug!("Cursor {} not in the last {} messages, waiting", id, messages.len()),
				}
			}

			match self.inner.registry.register(seen, channel) {
				Registration::Registered(waiter) => return Ok(Outcome::Pending(waiter)),
				Registration::Stale(returned) => {
					trace!("Registry drained during poll, checking the log again");
					channel = returned;
				}
			}
		}
	}

	/// Resolve every pending waiter with `message` and leave the registry empty.
	///
	/// A dead channel is skipped and logged; it never stops delivery to the others.
	pub fn notify_new_message(&self, message: &Message) -> FanOut {
		let waiters = self.inner.registry.drain();
		let mut fan_out = FanOut::default();

		for waiter in waiters {
			let id = waiter.id();

			if waiter.is_closed() {
				warn!("Waiter {} disappeared before message {} arrived", id, message.id);
				fan_out.skipped += 1;
				continue;
			}

			match waiter.resolve(Delivery::single(message.clone())) {
				DeliveryResult::Delivered => fan_out.delivered += 1,
				DeliveryResult::BackPressure => {
					let diagnostic = Error::Delivery(format!("waiter {} is not keeping up", id)).into_diagnostic();
					warn!(code = %diagnostic.code, "{}", diagnostic.message);
					fan_out.skipped += 1;
				}
				DeliveryResult::Disconnected => {
					let diagnostic = Error::Delivery(format!("waiter {} disconnected", id)).into_diagnostic();
					warn!(code = %diagnostic.code, "{}", diagnostic.message);
					fan_out.skipped += 1;
				}
			}
		}

		debug!(
			"Fanned out message {} to {} waiters ({} skipped)",
			message.id, fan_out.delivered, fan_out.skipped
		);
		fan_out
	}

	/// Append a message to the log and wake every pending waiter with it.
	pub fn post(&self, author: &str, body: &str) -> Result<Message> {
		let message = self.inner.log.append(author, body).map_err(|err| {
			error!("Failed to append message from {}: {}", author, err);
			Error::from(err)
		})?;

		self.notify_new_message(&message);
		Ok(message)
	}

	/// Drop a pending waiter whose connection went away. Idempotent.
	pub fn remove_waiter(&self, id: WaiterId) -> bool {
		self.inner.registry.remove(id)
	}

	/// The newest `limit` messages, oldest first.
	pub fn history(&self, limit: usize) -> Result<Vec<Message>> {
		self.recent(limit)
	}

	/// Cursor pointing at the newest message, or the empty cursor for an empty log.
	pub fn latest_cursor(&self) -> Result<Cursor> {
		let mut cursor = Cursor::empty();
		cursor.advance(&self.recent(1)?);
		Ok(cursor)
	}

	/// Poll and, if nothing is new, suspend until a message is delivered.
	///
	/// Dropping the returned future removes the waiter, which is how a
	/// disconnecting client cancels. Bounded by `max_wait` when configured.
	pub async fn wait(&self, cursor: Cursor) -> Result<WaitOutcome> {
		let (channel, rx) = oneshot_channel();

		let id = match self.poll(&cursor, Box::new(channel))? {
			Outcome::Ready(messages) => return Ok(WaitOutcome::Messages(messages)),
			Outcome::Pending(id) => id,
		};
		let _guard = WaiterGuard {
			broker: self,
			id,
		};

		let received = match self.inner.config.max_wait {
			Some(max_wait) => match timeout(max_wait, rx).await {
				Ok(received) => received,
				Err(_) => {
					debug!("Waiter {} timed out after {:?}", id, max_wait);
					return Ok(WaitOutcome::TimedOut);
				}
			},
			None => rx.await,
		};

		match received {
			Ok(delivery) => Ok(WaitOutcome::Messages(delivery.messages)),
			Err(_) => Err(Error::Delivery(format!("waiter {} was dropped without a delivery", id))),
		}
	}

	/// [`post`](Self::post) on the blocking pool.
	///
	/// Log adapters may do file I/O under a lock; async transports call this so
	/// a slow disk does not stall the worker thread serving other connections.
	pub async fn post_offloaded(&self, author: String, body: String) -> Result<Message> {
		let broker = self.clone();
		offload(move || broker.post(&author, &body)).await
	}

	/// [`history`](Self::history) on the blocking pool.
	pub async fn history_offloaded(&self, limit: usize) -> Result<Vec<Message>> {
		let broker = self.clone();
		offload(move || broker.history(limit)).await
	}

	fn window(&self) -> usize {
		self.inner.log.capacity().unwrap_or(self.inner.config.poll_window)
	}

	fn recent(&self, limit: usize) -> Result<Vec<Message>> {
		self.inner.log.recent(limit).map_err(|err| {
			error!("Failed to read message log: {}", err);
			Error::from(err)
		})
	}
}

async fn offload<T, F>(task: F) -> Result<T>
where
	F: FnOnce() -> Result<T> + Send + 'static,
	T: Send + 'static,
{
	spawn_blocking(task).await.map_err(|e| Error::Subsystem(format!("log task failed: {}", e)))?
}

/// Removes a waiter when the waiting task ends, however it ends.
struct WaiterGuard<'a> {
	broker: &'a Broker,
	id: WaiterId,
}

impl Drop for WaiterGuard<'_> {
	fn drop(&mut self) {
		if self.broker.remove_waiter(self.id) {
			debug!("Removed one waiter");
		}
	}
}
