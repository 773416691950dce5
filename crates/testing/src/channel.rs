// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! A delivery channel that records what it receives.

use std::sync::{
	Arc,
	atomic::{AtomicBool, AtomicUsize, Ordering},
};

use murmur_broker::{Delivery, DeliveryChannel, DeliveryResult};
use parking_lot::Mutex;

#[derive(Default)]
struct Shared {
	closed: AtomicBool,
	resolutions: AtomicUsize,
	deliveries: Mutex<Vec<Delivery>>,
}

/// Channel side, handed to the broker.
pub struct RecordingChannel {
	shared: Arc<Shared>,
}

/// Observer side, kept by the test.
#[derive(Clone)]
pub struct Recorder {
	shared: Arc<Shared>,
}

pub fn recording_channel() -> (RecordingChannel, Recorder) {
	let shared = Arc::new(Shared::default());
	(
		RecordingChannel {
			shared: shared.clone(),
		},
		Recorder {
			shared,
		},
	)
}

impl Recorder {
	/// Simulate the client going away.
	pub fn close(&self) {
		self.shared.closed.store(true, Ordering::SeqCst);
	}

	/// How many times `resolve` was called, including calls on a closed channel.
	pub fn resolutions(&self) -> usize {
		self.shared.resolutions.load(Ordering::SeqCst)
	}

	pub fn deliveries(&self) -> Vec<Delivery> {
		self.shared.deliveries.lock().clone()
	}
}

impl DeliveryChannel for RecordingChannel {
	fn is_closed(&self) -> bool {
		self.shared.closed.load(Ordering::SeqCst)
	}

	fn resolve(self: Box<Self>, delivery: Delivery) -> DeliveryResult {
		self.shared.resolutions.fetch_add(1, Ordering::SeqCst);
		if self.is_closed() {
			return DeliveryResult::Disconnected;
		}

		self.shared.deliveries.lock().push(delivery);
		DeliveryResult::Delivered
	}
}
