// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test helpers shared by the murmur crates.

pub mod channel;
pub mod log;
pub mod tempdir;
pub mod util;

pub use channel::{Recorder, RecordingChannel, recording_channel};
pub use log::FailingLog;
pub use tempdir::TempDir;
pub use util::wait::{wait_for, wait_for_condition};
