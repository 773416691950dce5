// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! End to end broker behaviour against a real log and recording channels.

use std::sync::Arc;

use murmur_broker::{Broker, BrokerConfig, Outcome};
use murmur_log::{CappedLog, MessageLog};
use murmur_testing::{FailingLog, recording_channel};
use murmur_type::{Cursor, Error, MessageId};
use serde_json::json;

fn broker() -> Broker {
	Broker::new(Arc::new(CappedLog::new(50)), BrokerConfig::default())
}

#[test]
fn test_first_poll_waits_then_receives_post() {
	let broker = broker();
	let (channel, recorder) = recording_channel();

	let outcome = broker.poll(&Cursor::empty(), Box::new(channel)).unwrap();
	assert!(matches!(outcome, Outcome::Pending(_)));

	let message = broker.post("alice", "hi").unwrap();

	let deliveries = recorder.deliveries();
	assert_eq!(deliveries.len(), 1);
	assert_eq!(
		serde_json::to_value(&deliveries[0]).unwrap(),
		json!({ "messages": [{ "_id": message.id.as_str(), "from": "alice", "body": "hi" }] })
	);
	assert_eq!(broker.waiter_count(), 0);
}

#[test]
fn test_catching_up_returns_everything_after_cursor() {
	let broker = broker();
	let a = broker.post("alice", "m1").unwrap();
	let b = broker.post("bob", "m2").unwrap();

	let (channel, recorder) = recording_channel();
	let outcome = broker.poll(&Cursor::at(a.id), Box::new(channel)).unwrap();

	assert_eq!(outcome, Outcome::Ready(vec![b]));
	assert_eq!(recorder.resolutions(), 0, "ready replies bypass the channel");
	assert_eq!(broker.waiter_count(), 0);
}

#[test]
fn test_backlog_after_cursor_in_order() {
	let broker = broker();
	let posted: Vec<_> = (0..8).map(|i| broker.post("alice", &format!("m{i}")).unwrap()).collect();

	for k in 0..posted.len() - 1 {
		let (channel, _recorder) = recording_channel();
		let outcome = broker.poll(&Cursor::at(posted[k].id.clone()), Box::new(channel)).unwrap();
		assert_eq!(outcome, Outcome::Ready(posted[k + 1..].to_vec()), "cursor at message {k}");
	}
}

#[test]
fn test_cursor_at_newest_waits() {
	let broker = broker();
	let newest = broker.post("alice", "m1").unwrap();

	let (channel, _recorder) = recording_channel();
	let outcome = broker.poll(&Cursor::at(newest.id), Box::new(channel)).unwrap();
	assert!(matches!(outcome, Outcome::Pending(_)));
}

#[test]
fn test_unknown_cursor_waits() {
	let broker = broker();
	broker.post("alice", "m1").unwrap();
	broker.post("bob", "m2").unwrap();

	let (channel, _recorder) = recording_channel();
	let outcome = broker.poll(&Cursor::at(MessageId::new("Z")), Box::new(channel)).unwrap();
	assert!(matches!(outcome, Outcome::Pending(_)));
	assert_eq!(broker.waiter_count(), 1);
}

#[test]
fn test_aged_out_cursor_waits() {
	let broker = Broker::new(Arc::new(CappedLog::new(3)), BrokerConfig::default());
	let oldest = broker.post("alice", "m0").unwrap();
	for i in 1..5 {
		broker.post("alice", &format!("m{i}")).unwrap();
	}

	let (channel, _recorder) = recording_channel();
	let outcome = broker.poll(&Cursor::at(oldest.id), Box::new(channel)).unwrap();
	assert!(matches!(outcome, Outcome::Pending(_)));
}

#[test]
fn test_empty_cursor_never_ready() {
	let broker = broker();
	for i in 0..5 {
		broker.post("alice", &format!("m{i}")).unwrap();
	}

	let (channel, recorder) = recording_channel();
	let outcome = broker.poll(&Cursor::empty(), Box::new(channel)).unwrap();
	assert!(matches!(outcome, Outcome::Pending(_)));
	assert!(recorder.deliveries().is_empty());
}

#[test]
fn test_dead_waiter_does_not_block_others() {
	let broker = broker();
	let (dead, dead_recorder) = recording_channel();
	let (live, live_recorder) = recording_channel();

	broker.poll(&Cursor::empty(), Box::new(dead)).unwrap();
	broker.poll(&Cursor::empty(), Box::new(live)).unwrap();
	dead_recorder.close();

	let message = broker.post("alice", "hi").unwrap();

	assert!(dead_recorder.deliveries().is_empty());
	let deliveries = live_recorder.deliveries();
	assert_eq!(deliveries.len(), 1);
	assert_eq!(deliveries[0].messages, vec![message]);
	assert_eq!(broker.waiter_count(), 0);
}

#[test]
fn test_every_waiter_resolved_exactly_once() {
	let broker = broker();
	let recorders: Vec<_> = (0..16)
		.map(|_| {
			let (channel, recorder) = recording_channel();
			broker.poll(&Cursor::empty(), Box::new(channel)).unwrap();
			recorder
		})
		.collect();
	assert_eq!(broker.waiter_count(), 16);

	let first = broker.post("alice", "one").unwrap();
	broker.post("alice", "two").unwrap();

	for recorder in &recorders {
		assert_eq!(recorder.resolutions(), 1);
		assert_eq!(recorder.deliveries()[0].messages, vec![first.clone()]);
	}
	assert_eq!(broker.waiter_count(), 0);
}

#[test]
fn test_waiter_behind_receives_only_newest() {
	let broker = Broker::new(Arc::new(CappedLog::new(3)), BrokerConfig::default());
	let first = broker.post("alice", "m0").unwrap();
	for i in 1..5 {
		broker.post("alice", &format!("m{i}")).unwrap();
	}

	// m0 has aged out of the log, so the backlog after it cannot be replayed
	let (channel, recorder) = recording_channel();
	let outcome = broker.poll(&Cursor::at(first.id), Box::new(channel)).unwrap();
	assert!(matches!(outcome, Outcome::Pending(_)));

	let newest = broker.post("bob", "newest").unwrap();
	assert_eq!(recorder.resolutions(), 1);
	assert_eq!(recorder.deliveries()[0].messages, vec![newest]);
}

#[test]
fn test_waiter_with_unknown_cursor_receives_only_newest() {
	let broker = broker();
	for i in 0..3 {
		broker.post("alice", &format!("m{i}")).unwrap();
	}

	let (channel, recorder) = recording_channel();
	let outcome = broker.poll(&Cursor::at(MessageId::new("gone")), Box::new(channel)).unwrap();
	assert!(matches!(outcome, Outcome::Pending(_)));

	let newest = broker.post("bob", "newest").unwrap();
	assert_eq!(recorder.deliveries()[0].messages, vec![newest]);
}

#[test]
fn test_remove_waiter_is_idempotent() {
	let broker = broker();
	let (channel, recorder) = recording_channel();

	let Outcome::Pending(id) = broker.poll(&Cursor::empty(), Box::new(channel)).unwrap() else {
		panic!("expected a pending poll");
	};

	assert!(broker.remove_waiter(id));
	assert!(!broker.remove_waiter(id));
	assert_eq!(broker.waiter_count(), 0);

	broker.post("alice", "hi").unwrap();
	assert_eq!(recorder.resolutions(), 0, "removed waiters are never resolved");
}

#[test]
fn test_storage_failure_surfaces_and_keeps_waiters() {
	let log = Arc::new(FailingLog::default());
	let broker = Broker::new(log.clone(), BrokerConfig::default());
	let seed = broker.post("alice", "seed").unwrap();

	let (waiting, recorder) = recording_channel();
	broker.poll(&Cursor::empty(), Box::new(waiting)).unwrap();

	log.set_failing(true);

	let (channel, _) = recording_channel();
	let err = broker.poll(&Cursor::at(seed.id.clone()), Box::new(channel)).unwrap_err();
	assert!(matches!(err, Error::Storage(_)));

	let err = broker.post("bob", "lost").unwrap_err();
	assert!(matches!(err, Error::Storage(_)));
	assert_eq!(broker.waiter_count(), 1, "a failed post wakes nobody");
	assert_eq!(recorder.resolutions(), 0);

	log.set_failing(false);
	let message = broker.post("bob", "back").unwrap();
	assert_eq!(recorder.deliveries()[0].messages, vec![message]);
	assert_eq!(log.recent(10).unwrap().len(), 2);
}

#[test]
fn test_history_is_oldest_first() {
	let broker = broker();
	let posted: Vec<_> = (0..5).map(|i| broker.post("alice", &format!("m{i}")).unwrap()).collect();

	assert_eq!(broker.history(3).unwrap(), posted[2..].to_vec());
	assert_eq!(broker.history(100).unwrap(), posted);
}

#[test]
fn test_storage_failure_reaches_empty_cursor_poll() {
	let log = Arc::new(FailingLog::default());
	let broker = Broker::new(log.clone(), BrokerConfig::default());
	log.set_failing(true);

	let (channel, recorder) = recording_channel();
	let err = broker.poll(&Cursor::empty(), Box::new(channel)).unwrap_err();
	assert!(matches!(err, Error::Storage(_)));
	assert_eq!(broker.waiter_count(), 0, "a failed poll registers nothing");

	log.set_failing(false);
	broker.post("alice", "hi").unwrap();
	assert_eq!(recorder.resolutions(), 0);
}
