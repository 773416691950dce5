// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Registry of pending waiters.
//!
//! All reads and writes go through one mutex, held only for the in-memory
//! mutation. Log queries and channel writes happen outside of it.

use std::{
	collections::HashMap,
	mem,
	sync::atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;
use tracing::debug;

use crate::{
	delivery::DeliveryChannel,
	waiter::{Waiter, WaiterId},
};

/// Number of drains a registry has gone through.
///
/// A poll reads the epoch before querying the log. If the epoch moved by the
/// time it registers, a post drained the registry in between and the poll must
/// look at the log again instead of waiting for a wakeup that already happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Epoch(u64);

/// Result of [`WaiterRegistry::register`].
pub enum Registration {
	Registered(WaiterId),
	/// A drain happened since the given epoch; the channel is handed back unregistered.
	Stale(Box<dyn DeliveryChannel>),
}

struct RegistryState {
	waiters: HashMap<WaiterId, Waiter>,
	epoch: u64,
}

/// Set of currently pending waiters, shared by every poll and post of one broker.
pub struct WaiterRegistry {
	state: Mutex<RegistryState>,
	next_id: AtomicU64,
}

impl WaiterRegistry {
	pub fn new() -> Self {
		Self {
			state: Mutex::new(RegistryState {
				waiters: HashMap::new(),
				epoch: 0,
			}),
			next_id: AtomicU64::new(1),
		}
	}

	pub fn epoch(&self) -> Epoch {
		Epoch(self.state.lock().epoch)
	}

	/// Register a waiter, unless the registry was drained after `seen`.
	pub fn register(&self, seen: Epoch, channel: Box<dyn DeliveryChannel>) -> Registration {
		let mut state = self.state.lock();
		if state.epoch != seen.0 {
			return Registration::Stale(channel);
		}

		let id = WaiterId(self.next_id.fetch_add(1, Ordering::Relaxed));
		state.waiters.insert(id, Waiter::new(id, channel));
		drop(state);

		debug!("Registered waiter {}", id);
		Registration::Registered(id)
	}

	/// Remove a pending waiter. Returns false if it was not registered.
	pub fn remove(&self, id: WaiterId) -> bool {
		let removed = self.state.lock().waiters.remove(&id);
		match removed {
			Some(waiter) => {
				debug!("Removed waiter {} after {:?}", id, waiter.waited());
				true
			}
			None => false,
		}
	}

	/// Take every pending waiter and leave the registry empty.
	pub fn drain(&self) -> Vec<Waiter> {
		let mut state = self.state.lock();
		state.epoch += 1;
		let waiters = mem::take(&mut state.waiters);
		drop(state);

		waiters.into_values().collect()
	}

	pub fn len(&self) -> usize {
		self.state.lock().waiters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.state.lock().waiters.is_empty()
	}
}

impl Default for WaiterRegistry {
	fn default() -> Self {
		Self::new()
	}
}
