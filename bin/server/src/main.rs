// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod config;

use std::process::ExitCode;

use clap::Parser;
use murmur_broker::Broker;
use murmur_sub_api::{SharedRuntime, Subsystem};
use murmur_sub_server_http::{AppState, HttpSubsystem};
use murmur_sub_server_ws::WsSubsystem;
use murmur_sub_tracing::TracingBuilder;
use murmur_type::Result;

use crate::config::Cli;

fn main() -> ExitCode {
	let cli = Cli::parse();

	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			tracing::error!("{}", e);
			eprintln!("murmur-server: {}", e);
			ExitCode::FAILURE
		}
	}
}

fn run(cli: Cli) -> Result<()> {
	let mut logging = cli.tracing(TracingBuilder::new()).build();
	logging.start()?;

	let runtime = SharedRuntime::new(cli.threads)?;
	let log = cli.open_log()?;
	let broker = Broker::new(log, cli.broker_config());
	tracing::info!("Message log backend {:?}, max wait {:?}", cli.backend, broker.config().max_wait);

	let mut subsystems: Vec<Box<dyn Subsystem>> = Vec::new();
	subsystems.push(Box::new(HttpSubsystem::new(AppState::new(broker.clone(), cli.http_config()), runtime.clone())));
	if let Some(ws_config) = cli.ws_config() {
		subsystems.push(Box::new(WsSubsystem::new(ws_config, broker.clone(), runtime.clone())));
	}

	for i in 0..subsystems.len() {
		if let Err(e) = subsystems[i].start() {
			tracing::error!("{} subsystem failed to start", subsystems[i].name());
			stop_all(&mut subsystems[..i]);
			return Err(e);
		}
		tracing::info!("{} subsystem started", subsystems[i].name());
	}

	match runtime.block_on(tokio::signal::ctrl_c()) {
		Ok(()) => tracing::info!("Received interrupt, shutting down"),
		Err(e) => tracing::warn!("Failed to listen for interrupt ({}), shutting down", e),
	}

	stop_all(&mut subsystems);
	logging.shutdown()?;
	Ok(())
}

fn stop_all(subsystems: &mut [Box<dyn Subsystem>]) {
	for subsystem in subsystems.iter_mut().rev() {
		if let Err(e) = subsystem.shutdown() {
			tracing::warn!("{} subsystem failed to shut down: {}", subsystem.name(), e);
		}
	}
}
