// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Expiring key-value storage for ciphertext.
//!
//! The engine only needs five primitives from its backing store. Expiry is
//! always the store's job: once a TTL elapses the entry must read as absent.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::instrument;

use crate::error::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// An expiring key-value store holding secret values.
#[async_trait]
pub trait SecretStore: Send + Sync {
	/// Short backend label for logs and health output.
	fn name(&self) -> &'static str;

	/// Write `value` under `key`, replacing any previous entry, expiring after `ttl`.
	async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> StoreResult<()>;

	async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

	/// Remove `key`. Removing an absent key is not an error.
	async fn delete(&self, key: &str) -> StoreResult<()>;

	async fn exists(&self, key: &str) -> StoreResult<bool>;

	/// Liveness probe.
	async fn ping(&self) -> StoreResult<()>;
}

#[derive(Debug)]
struct Entry {
	value: Vec<u8>,
	expires_at: Instant,
}

impl Entry {
	fn is_live(&self, now: Instant) -> bool {
		now < self.expires_at
	}
}

/// In-process store with absolute deadlines.
///
/// Expired entries are evicted when touched and by [`MemoryStore::purge_expired`].
/// Deadlines use tokio's clock, so a paused runtime can fast-forward expiry.
#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Drop every expired entry, returning how many were removed.
	pub fn purge_expired(&self) -> usize {
		let now = Instant::now();
		let mut entries = self.entries.lock();
		let before = entries.len();
		entries.retain(|_, entry| entry.is_live(now));
		before - entries.len()
	}

	/// Number of entries held, including expired ones not yet evicted.
	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Raw stored bytes for `key`, ignoring expiry.
	pub fn peek_raw(&self, key: &str) -> Option<Vec<u8>> {
		self.entries.lock().get(key).map(|entry| entry.value.clone())
	}
}

#[async_trait]
impl SecretStore for MemoryStore {
	fn name(&self) -> &'static str {
		"memory"
	}

	#[instrument(skip(self, value), fields(ttl_secs = ttl.as_secs()))]
	async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> StoreResult<()> {
		let expires_at = Instant::now()
			.checked_add(ttl)
			.ok_or_else(|| StoreError::unavailable("memory", "ttl overflows the clock"))?;
		let entry = Entry {
			value: value.to_vec(),
			expires_at,
		};
		self.entries.lock().insert(key.to_string(), entry);
		Ok(())
	}

	#[instrument(skip(self))]
	async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
		let now = Instant::now();
		let mut entries = self.entries.lock();
		let expired = match entries.get(key) {
			Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
			Some(_) => true,
			None => false,
		};
		if expired {
			entries.remove(key);
		}
		Ok(None)
	}

	#[instrument(skip(self))]
	async fn delete(&self, key: &str) -> StoreResult<()> {
		self.entries.lock().remove(key);
		Ok(())
	}

	#[instrument(skip(self))]
	async fn exists(&self, key: &str) -> StoreResult<bool> {
		Ok(self.get(key).await?.is_some())
	}

	async fn ping(&self) -> StoreResult<()> {
		Ok(())
	}
}
