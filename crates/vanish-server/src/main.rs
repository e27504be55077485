// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Vanish one-time secret server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vanish_server::{
	connect_store, create_app_state, create_router, startup_probe, version, RedactingMakeWriter,
};
use vanish_server_config::LogFormat;

/// Vanish server - share a secret once.
#[derive(Parser, Debug)]
#[command(name = "vanish-server", about = "One-time secret sharing server", version)]
struct Args {
	/// TOML config file (default: /etc/vanish/server.toml)
	#[arg(long, env = "VANISH_SERVER_CONFIG")]
	config: Option<PathBuf>,

	/// Port to listen on, overriding the configured port
	#[arg(long)]
	port: Option<u16>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Load .env before parsing so env-backed flags see it.
	dotenvy::dotenv().ok();

	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	let mut config = match &args.config {
		Some(path) => vanish_server_config::load_config_with_file(path.clone())?,
		None => vanish_server_config::load_config()?,
	};
	if let Some(port) = args.port {
		config.http.port = port;
	}

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());
	let writer = RedactingMakeWriter::new(std::io::stdout);
	match config.logging.format {
		LogFormat::Text => tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer().with_writer(writer))
			.init(),
		LogFormat::Json => tracing_subscriber::registry()
			.with(filter)
			.with(tracing_subscriber::fmt::layer().json().with_writer(writer))
			.init(),
	}

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		store = %config.store.backend,
		"starting vanish-server"
	);

	let connected = match connect_store(&config.store).await {
		Ok(connected) => connected,
		Err(e) => {
			tracing::error!(error = %e, "failed to connect to secret store");
			std::process::exit(1);
		}
	};

	let state = create_app_state(connected.store.clone(), &config)?;
	if startup_probe(&state.engine).await.is_err() {
		std::process::exit(1);
	}

	let app = create_router(state);

	let addr = config.socket_addr();
	let listener = tokio::net::TcpListener::bind(&addr).await?;
	tracing::info!(addr = %addr, "listening");

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	connected.shutdown();
	tracing::info!("Server shutdown complete");
	Ok(())
}
