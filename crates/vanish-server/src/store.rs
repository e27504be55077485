// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backend selection from configuration.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use vanish_core::{MemoryStore, SecretStore, StoreError};
use vanish_server_config::{StoreBackend, StoreConfig};
use vanish_server_store::{RedisStore, SqliteStore};

/// A connected store plus its expiry sweeper, if the backend needs one.
pub struct ConnectedStore {
	pub store: Arc<dyn SecretStore>,
	pub sweeper: Option<JoinHandle<()>>,
}

impl ConnectedStore {
	pub fn shutdown(self) {
		if let Some(sweeper) = self.sweeper {
			sweeper.abort();
		}
	}
}

/// Connect the configured backend. Redis expires keys itself; the memory and
/// SQLite backends get a periodic purge task.
pub async fn connect_store(config: &StoreConfig) -> Result<ConnectedStore, StoreError> {
	info!(backend = %config.backend, "connecting secret store");

	match config.backend {
		StoreBackend::Memory => {
			let store = Arc::new(MemoryStore::new());
			let sweeper = spawn_memory_sweeper(store.clone(), config.sweep_interval());
			Ok(ConnectedStore {
				store,
				sweeper: Some(sweeper),
			})
		}
		StoreBackend::Redis => {
			let store = RedisStore::connect(config.redis_url.expose()).await?;
			Ok(ConnectedStore {
				store: Arc::new(store),
				sweeper: None,
			})
		}
		StoreBackend::Sqlite => {
			let store = Arc::new(SqliteStore::connect(&config.sqlite_url).await?);
			let sweeper = store.clone().spawn_sweeper(config.sweep_interval());
			Ok(ConnectedStore {
				store,
				sweeper: Some(sweeper),
			})
		}
	}
}

fn spawn_memory_sweeper(store: Arc<MemoryStore>, interval: Duration) -> JoinHandle<()> {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		ticker.tick().await;

		loop {
			ticker.tick().await;
			let purged = store.purge_expired();
			if purged > 0 {
				info!(purged, "purged expired secrets");
			} else {
				debug!("no expired secrets to purge");
			}
		}
	})
}
