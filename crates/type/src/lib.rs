// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Value types shared by every murmur crate: messages, cursors, post bodies and errors.

pub mod body;
pub mod error;
pub mod message;

pub use error::{
	Error, Result,
	diagnostic::{Diagnostic, IntoDiagnostic},
};
pub use message::{Cursor, Message, MessageId};
