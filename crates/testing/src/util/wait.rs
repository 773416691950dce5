// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Polling waits for tests that observe state changed by another task,
//! such as a waiter showing up in a broker's registry.

use std::time::Duration;

use tokio::time::{interval, timeout};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Re-check `condition` every `poll_interval` until it holds.
///
/// # Panics
/// When `limit` elapses first; the panic message includes `what`.
pub async fn wait_for_condition<F>(condition: F, limit: Duration, poll_interval: Duration, what: &str)
where
	F: Fn() -> bool,
{
	let mut ticks = interval(poll_interval);
	let polled = timeout(limit, async {
		loop {
			ticks.tick().await;
			if condition() {
				return;
			}
		}
	})
	.await;

	if polled.is_err() {
		panic!("Timeout after {:?}: {}", limit, what);
	}
}

/// [`wait_for_condition`] with [`DEFAULT_TIMEOUT`] and [`DEFAULT_POLL_INTERVAL`].
pub async fn wait_for<F>(condition: F, what: &str)
where
	F: Fn() -> bool,
{
	wait_for_condition(condition, DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL, what).await;
}
