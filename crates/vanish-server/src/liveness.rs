// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Store liveness checks composed around engine operations.
//!
//! At startup an unreachable store is fatal. During request handling every
//! engine call is preceded by a ping so an outage surfaces as
//! `StoreUnavailable` before any work is attempted.

use std::future::Future;

use tracing::{error, info};
use vanish_core::{SecretEngine, VanishResult};

/// Ping the store once before serving. The caller exits on `Err`.
pub async fn startup_probe(engine: &SecretEngine) -> VanishResult<()> {
	match engine.ping().await {
		Ok(()) => {
			info!(store = engine.store_name(), "secret store reachable");
			Ok(())
		}
		Err(e) => {
			error!(store = engine.store_name(), error = %e, "failed to connect to secret store");
			Err(e)
		}
	}
}

/// Ping the store, then run `op`.
pub async fn with_liveness<T, F, Fut>(engine: &SecretEngine, op: F) -> VanishResult<T>
where
	F: FnOnce() -> Fut,
	Fut: Future<Output = VanishResult<T>>,
{
	engine.ping().await?;
	op().await
}
