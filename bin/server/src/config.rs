// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{ArgAction, Parser, ValueEnum};
use murmur_broker::BrokerConfig;
use murmur_log::{CappedLog, ListLog, MessageLog, SqliteLog};
use murmur_sub_server_http::HttpConfig;
use murmur_sub_server_ws::WsConfig;
use murmur_sub_tracing::{LogFormat, TracingBuilder};
use murmur_type::Result;

/// Storage behind the message log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
	/// In-memory capped collection, oldest message evicted first
	Capped,
	/// In-memory list of JSON encoded messages
	List,
	/// SQLite database file
	Sqlite,
}

/// Long-poll and WebSocket chat message server
#[derive(Parser, Debug, Clone)]
#[command(name = "murmur-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	/// Address to bind both servers to
	#[arg(long = "host", value_name = "ADDR", env = "MURMUR_HOST", default_value = "0.0.0.0")]
	pub host: String,

	/// HTTP long-poll port
	#[arg(short = 'p', long = "port", value_name = "PORT", env = "MURMUR_PORT", default_value_t = 8888)]
	pub port: u16,

	/// WebSocket port
	#[arg(long = "ws-port", value_name = "PORT", env = "MURMUR_WS_PORT", default_value_t = 8889)]
	pub ws_port: u16,

	/// Disable the WebSocket server
	#[arg(long = "no-ws", action = ArgAction::SetTrue, env = "MURMUR_NO_WS")]
	pub no_ws: bool,

	/// Message log backend
	#[arg(long = "backend", value_enum, env = "MURMUR_BACKEND", default_value_t = Backend::Capped)]
	pub backend: Backend,

	/// Database file for the sqlite backend
	#[arg(long = "sqlite-path", value_name = "FILE", env = "MURMUR_SQLITE_PATH", default_value = "murmur.db")]
	pub sqlite_path: PathBuf,

	/// Messages kept by the log. 0 keeps everything (list and sqlite backends only)
	#[arg(long = "capacity", value_name = "N", env = "MURMUR_CAPACITY", default_value_t = murmur_log::DEFAULT_CAPACITY)]
	pub capacity: usize,

	/// Seconds a long-poll is held before answering with no messages. 0 holds it until the next message
	#[arg(long = "max-wait-secs", value_name = "SECS", env = "MURMUR_MAX_WAIT_SECS", default_value_t = 55)]
	pub max_wait_secs: u64,

	/// Log level or filter directive, overridden by RUST_LOG
	#[arg(short = 'l', long = "log-level", value_name = "LEVEL", env = "MURMUR_LOG_LEVEL", default_value = "info")]
	pub log_level: String,

	/// Log as JSON lines
	#[arg(long = "log-json", action = ArgAction::SetTrue, env = "MURMUR_LOG_JSON")]
	pub log_json: bool,

	/// Runtime worker threads
	#[arg(long = "threads", value_name = "N", env = "MURMUR_THREADS", default_value_t = 4)]
	pub threads: usize,
}

impl Cli {
	pub fn tracing(&self, builder: TracingBuilder) -> TracingBuilder {
		let format = if self.log_json {
			LogFormat::Json
		} else {
			LogFormat::Compact
		};
		builder.with_level(self.log_level.clone()).with_format(format)
	}

	pub fn broker_config(&self) -> BrokerConfig {
		let config = BrokerConfig::default();
		match self.max_wait_secs {
			0 => config,
			secs => config.with_max_wait(Duration::from_secs(secs)),
		}
	}

	pub fn http_config(&self) -> HttpConfig {
		HttpConfig::new(format!("{}:{}", self.host, self.port))
	}

	pub fn ws_config(&self) -> Option<WsConfig> {
		if self.no_ws {
			return None;
		}
		Some(WsConfig::new(format!("{}:{}", self.host, self.ws_port)))
	}

	pub fn open_log(&self) -> Result<Arc<dyn MessageLog>> {
		let log: Arc<dyn MessageLog> = match self.backend {
			Backend::Capped => Arc::new(CappedLog::new(self.capacity)),
			Backend::List => match self.capacity {
				0 => Arc::new(ListLog::new("conversation")),
				n => Arc::new(ListLog::new("conversation").with_trim(n)),
			},
			Backend::Sqlite => {
				let log = SqliteLog::open(&self.sqlite_path)?;
				match self.capacity {
					0 => Arc::new(log),
					n => Arc::new(log.with_capacity(n)),
				}
			}
		};
		Ok(log)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(args: &[&str]) -> Cli {
		Cli::try_parse_from(std::iter::once("murmur-server").chain(args.iter().copied())).unwrap()
	}

	#[test]
	fn test_defaults() {
		let cli = parse(&[]);
		assert_eq!(cli.port, 8888);
		assert_eq!(cli.backend, Backend::Capped);
		assert_eq!(cli.capacity, 50);
		assert_eq!(cli.broker_config().max_wait, Some(Duration::from_secs(55)));
		assert_eq!(cli.http_config().bind_addr, "0.0.0.0:8888");
		assert_eq!(cli.ws_config().unwrap().bind_addr, "0.0.0.0:8889");
	}

	#[test]
	fn test_flags() {
		let cli = parse(&["--no-ws", "--max-wait-secs", "0", "--host", "127.0.0.1", "-p", "9000"]);
		assert!(cli.ws_config().is_none());
		assert_eq!(cli.broker_config().max_wait, None);
		assert_eq!(cli.http_config().bind_addr, "127.0.0.1:9000");
	}

	#[test]
	fn test_open_log_per_backend() {
		let capped = parse(&["--capacity", "3"]).open_log().unwrap();
		assert_eq!(capped.capacity(), Some(3));

		let list = parse(&["--backend", "list", "--capacity", "0"]).open_log().unwrap();
		assert_eq!(list.capacity(), None);

		let sqlite = parse(&["--backend", "sqlite", "--sqlite-path", ":memory:"]).open_log().unwrap();
		assert_eq!(sqlite.capacity(), Some(50));
		sqlite.append("alice", "hi").unwrap();
		assert_eq!(sqlite.recent(10).unwrap().len(), 1);
	}
}
