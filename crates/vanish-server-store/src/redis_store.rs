// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redis-backed secret store.
//!
//! Expiry is native: values are written with `SET key value EX ttl`. One
//! [`ConnectionManager`] is opened at startup and shared by every request;
//! it reconnects on its own after a dropped connection.

use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use tracing::{debug, instrument};
use vanish_core::{SecretStore, StoreError, StoreResult};

const BACKEND: &str = "redis";

fn unavailable(e: RedisError) -> StoreError {
	StoreError::unavailable(BACKEND, e.to_string())
}

/// Whole seconds for `SET .. EX`, which rejects zero.
fn expiry_seconds(ttl: Duration) -> u64 {
	ttl.as_secs().max(1)
}

/// Secret store over a Redis server.
#[derive(Clone)]
pub struct RedisStore {
	conn: ConnectionManager,
}

impl RedisStore {
	/// Open a managed connection to `url` (e.g. `redis://localhost:6379/0`).
	#[instrument(skip(url))]
	pub async fn connect(url: &str) -> StoreResult<Self> {
		let client = Client::open(url).map_err(unavailable)?;
		let conn = ConnectionManager::new(client).await.map_err(unavailable)?;
		debug!("redis connection established");
		Ok(Self { conn })
	}
}

#[async_trait]
impl SecretStore for RedisStore {
	fn name(&self) -> &'static str {
		BACKEND
	}

	#[instrument(skip(self, value), fields(ttl_secs = ttl.as_secs()))]
	async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> StoreResult<()> {
		let mut conn = self.conn.clone();
		conn.set_ex::<_, _, ()>(key, value, expiry_seconds(ttl))
			.await
			.map_err(unavailable)
	}

	#[instrument(skip(self))]
	async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
		let mut conn = self.conn.clone();
		conn.get::<_, Option<Vec<u8>>>(key)
			.await
			.map_err(unavailable)
	}

	#[instrument(skip(self))]
	async fn delete(&self, key: &str) -> StoreResult<()> {
		let mut conn = self.conn.clone();
		conn.del::<_, ()>(key).await.map_err(unavailable)
	}

	#[instrument(skip(self))]
	async fn exists(&self, key: &str) -> StoreResult<bool> {
		let mut conn = self.conn.clone();
		conn.exists::<_, bool>(key).await.map_err(unavailable)
	}

	async fn ping(&self) -> StoreResult<()> {
		let mut conn = self.conn.clone();
		let _pong: String = redis::cmd("PING")
			.query_async(&mut conn)
			.await
			.map_err(unavailable)?;
		Ok(())
	}
}
