// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt::{self, Display, Formatter},
	ops::Deref,
	time::{Duration, Instant},
};

use crate::delivery::{Delivery, DeliveryChannel, DeliveryResult};

/// Identifier of a pending poll, unique within one registry.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash)]
pub struct WaiterId(pub u64);

impl Display for WaiterId {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		Display::fmt(&self.0, f)
	}
}

impl Deref for WaiterId {
	type Target = u64;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl From<WaiterId> for u64 {
	fn from(value: WaiterId) -> Self {
		value.0
	}
}

impl From<u64> for WaiterId {
	fn from(value: u64) -> Self {
		WaiterId(value)
	}
}

/// A suspended poll request and the channel its answer goes to.
pub struct Waiter {
	id: WaiterId,
	channel: Box<dyn DeliveryChannel>,
	registered_at: Instant,
}

impl Waiter {
	pub(crate) fn new(id: WaiterId, channel: Box<dyn DeliveryChannel>) -> Self {
		Self {
			id,
			channel,
			registered_at: Instant::now(),
		}
	}

	pub fn id(&self) -> WaiterId {
		self.id
	}

	/// Time spent in the registry so far.
	pub fn waited(&self) -> Duration {
		self.registered_at.elapsed()
	}

	pub fn is_closed(&self) -> bool {
		self.channel.is_closed()
	}

	/// Hand the delivery to the channel. Consumes the waiter, so it resolves at most once.
	pub fn resolve(self, delivery: Delivery) -> DeliveryResult {
		self.channel.resolve(delivery)
	}
}

impl fmt::Debug for Waiter {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Waiter").field("id", &self.id).field("registered_at", &self.registered_at).finish_non_exhaustive()
	}
}
