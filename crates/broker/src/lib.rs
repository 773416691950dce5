// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Long-poll notification broker for an append-only message log.
//!
//! A client asks "what is new since cursor C?". The [`Broker`] either answers
//! immediately from the [`MessageLog`](murmur_log::MessageLog) or registers a
//! waiter in the [`WaiterRegistry`]. Every successful post drains the registry
//! and resolves each waiter's [`DeliveryChannel`] exactly once.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use murmur_broker::{Broker, BrokerConfig, WaitOutcome};
//! use murmur_log::CappedLog;
//! use murmur_type::Cursor;
//!
//! let broker = Broker::new(Arc::new(CappedLog::default()), BrokerConfig::default());
//!
//! let waiter = {
//!     let broker = broker.clone();
//!     tokio::spawn(async move { broker.wait(Cursor::empty()).await })
//! };
//!
//! broker.post("alice", "hi")?;
//! let WaitOutcome::Messages(messages) = waiter.await?? else { unreachable!() };
//! ```

pub mod broker;
pub mod config;
pub mod cursor;
pub mod delivery;
pub mod registry;
pub mod waiter;

pub use broker::{Broker, FanOut, Outcome, WaitOutcome};
pub use config::BrokerConfig;
pub use delivery::{Delivery, DeliveryChannel, DeliveryResult, OneshotChannel, PushChannel, oneshot_channel, push_channel};
pub use registry::{Epoch, Registration, WaiterRegistry};
pub use waiter::{Waiter, WaiterId};
