// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite-backed secret store.
//!
//! SQLite has no native key expiry, so every row carries an absolute
//! `expires_at` (unix milliseconds). Reads filter on it, which is what makes
//! an expired row absent; [`SqliteStore::purge_expired`] and the sweeper
//! spawned by [`SqliteStore::spawn_sweeper`] only reclaim space.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};
use vanish_core::{SecretStore, StoreError, StoreResult};

const BACKEND: &str = "sqlite";

fn unavailable(e: sqlx::Error) -> StoreError {
	StoreError::unavailable(BACKEND, e.to_string())
}

fn now_millis() -> i64 {
	Utc::now().timestamp_millis()
}

fn deadline_millis(ttl: Duration) -> i64 {
	let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
	now_millis().saturating_add(ttl_ms)
}

/// Secret store over a SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
	pool: SqlitePool,
}

impl SqliteStore {
	/// Open (creating if missing) the database at `database_url` in WAL mode
	/// and ensure the schema exists.
	#[instrument(skip(database_url))]
	pub async fn connect(database_url: &str) -> StoreResult<Self> {
		let options = SqliteConnectOptions::from_str(database_url)
			.map_err(|e| StoreError::unavailable(BACKEND, format!("invalid database url: {e}")))?
			.journal_mode(SqliteJournalMode::Wal)
			.synchronous(SqliteSynchronous::Normal)
			.create_if_missing(true);

		let pool = SqlitePool::connect_with(options)
			.await
			.map_err(unavailable)?;
		debug!("database pool created");

		let store = Self::new(pool);
		store.migrate().await?;
		Ok(store)
	}

	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Create the secrets table and its expiry index if absent.
	pub async fn migrate(&self) -> StoreResult<()> {
		sqlx::query(
			r#"
			CREATE TABLE IF NOT EXISTS vanish_secrets (
				storage_key TEXT PRIMARY KEY NOT NULL,
				value BLOB NOT NULL,
				expires_at INTEGER NOT NULL
			)
			"#,
		)
		.execute(&self.pool)
		.await
		.map_err(unavailable)?;

		sqlx::query(
			r#"
			CREATE INDEX IF NOT EXISTS idx_vanish_secrets_expires_at
			ON vanish_secrets (expires_at)
			"#,
		)
		.execute(&self.pool)
		.await
		.map_err(unavailable)?;

		Ok(())
	}

	/// Delete every expired row, returning how many were removed.
	#[instrument(skip(self))]
	pub async fn purge_expired(&self) -> StoreResult<u64> {
		let result = sqlx::query(
			r#"
			DELETE FROM vanish_secrets
			WHERE expires_at <= ?
			"#,
		)
		.bind(now_millis())
		.execute(&self.pool)
		.await
		.map_err(unavailable)?;

		Ok(result.rows_affected())
	}

	/// Spawn a background task purging expired rows every `interval`.
	///
	/// The first purge runs one full interval after spawning.
	pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
		tokio::spawn(async move {
			let mut ticker = tokio::time::interval(interval);
			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
			ticker.tick().await;

			loop {
				ticker.tick().await;
				match self.purge_expired().await {
					Ok(0) => debug!("no expired secrets to purge"),
					Ok(purged) => info!(purged, "purged expired secrets"),
					Err(e) => warn!(error = %e, "expired secret purge failed"),
				}
			}
		})
	}
}

#[async_trait]
impl SecretStore for SqliteStore {
	fn name(&self) -> &'static str {
		BACKEND
	}

	#[instrument(skip(self, value), fields(ttl_secs = ttl.as_secs()))]
	async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> StoreResult<()> {
		sqlx::query(
			r#"
			INSERT OR REPLACE INTO vanish_secrets (storage_key, value, expires_at)
			VALUES (?, ?, ?)
			"#,
		)
		.bind(key)
		.bind(value)
		.bind(deadline_millis(ttl))
		.execute(&self.pool)
		.await
		.map_err(unavailable)?;

		Ok(())
	}

	#[instrument(skip(self))]
	async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
		sqlx::query_scalar::<_, Vec<u8>>(
			r#"
			SELECT value FROM vanish_secrets
			WHERE storage_key = ? AND expires_at > ?
			"#,
		)
		.bind(key)
		.bind(now_millis())
		.fetch_optional(&self.pool)
		.await
		.map_err(unavailable)
	}

	#[instrument(skip(self))]
	async fn delete(&self, key: &str) -> StoreResult<()> {
		sqlx::query("DELETE FROM vanish_secrets WHERE storage_key = ?")
			.bind(key)
			.execute(&self.pool)
			.await
			.map_err(unavailable)?;

		Ok(())
	}

	#[instrument(skip(self))]
	async fn exists(&self, key: &str) -> StoreResult<bool> {
		let count = sqlx::query_scalar::<_, i64>(
			r#"
			SELECT COUNT(*) FROM vanish_secrets
			WHERE storage_key = ? AND expires_at > ?
			"#,
		)
		.bind(key)
		.bind(now_millis())
		.fetch_one(&self.pool)
		.await
		.map_err(unavailable)?;

		Ok(count > 0)
	}

	async fn ping(&self) -> StoreResult<()> {
		sqlx::query("SELECT 1")
			.execute(&self.pool)
			.await
			.map_err(unavailable)?;
		Ok(())
	}
}
