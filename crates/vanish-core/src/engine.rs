// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret lifecycle engine.
//!
//! Per secret: `Unwritten -> Stored -> (Retrieved | Expired)`. Both terminal
//! states read as absent and cannot be told apart by a reader.
//!
//! Reads are fetch, then delete, then return. Two callers racing on the same
//! token can both fetch before either delete lands and both receive the
//! plaintext. That window is accepted: the engine stays stateless and holds
//! no locks, so any number of instances can share one store.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};
use vanish_common_secret::SecretString;

use crate::cipher::{self, EncryptionKey};
use crate::error::{VanishError, VanishResult};
use crate::storage_key::StorageKeyGenerator;
use crate::store::SecretStore;
use crate::token::Token;
use crate::ttl::Ttl;

/// Creates, resolves and consumes one-time secrets.
#[derive(Clone)]
pub struct SecretEngine {
	store: Arc<dyn SecretStore>,
	keys: StorageKeyGenerator,
}

impl SecretEngine {
	pub fn new(store: Arc<dyn SecretStore>, keys: StorageKeyGenerator) -> Self {
		Self { store, keys }
	}

	pub fn store(&self) -> &Arc<dyn SecretStore> {
		&self.store
	}

	pub fn store_name(&self) -> &'static str {
		self.store.name()
	}

	/// Encrypt and store `plaintext` for `ttl`, returning the retrieval token.
	///
	/// No token is produced unless the store write succeeded.
	#[instrument(skip(self, plaintext), fields(ttl_secs = ttl.as_secs(), store = self.store.name()))]
	pub async fn set_secret(&self, plaintext: &SecretString, ttl: Duration) -> VanishResult<Token> {
		if plaintext.is_empty() {
			return Err(VanishError::invalid_input("secret must not be empty"));
		}
		if ttl.is_zero() {
			return Err(VanishError::invalid_input("ttl must be at least one second"));
		}
		if ttl > Ttl::LONGEST.as_duration() {
			return Err(VanishError::invalid_input(format!(
				"ttl must not exceed {} seconds",
				Ttl::LONGEST.as_secs()
			)));
		}

		let storage_key = self.keys.generate();
		let (sealed, key) = cipher::encrypt(plaintext.expose().as_bytes())?;

		self.store.set_with_expiry(&storage_key, &sealed, ttl).await?;

		debug!(storage_key = %storage_key, "secret stored");
		Ok(Token::new(storage_key, key.to_url_safe()))
	}

	/// Resolve a token to its plaintext, consuming the secret.
	///
	/// Returns `Ok(None)` when the secret was already read or has expired.
	#[instrument(skip(self, token), fields(store = self.store.name()))]
	pub async fn get_secret(&self, token: &str) -> VanishResult<Option<SecretString>> {
		let token = Token::parse(token)?;
		let storage_key = token.storage_key();

		let fetched = self.store.get(storage_key).await?;
		// Delete even on a miss: the entry may have landed between get and now.
		self.store.delete(storage_key).await?;

		let Some(stored) = fetched else {
			debug!(storage_key = %storage_key, "secret absent");
			return Ok(None);
		};

		let plaintext = match token.encryption_key() {
			Some(encoded) => {
				let key = EncryptionKey::from_url_safe(encoded)?;
				let bytes = cipher::decrypt(&stored, &key)?;
				String::from_utf8(bytes.to_vec())
					.map_err(|_| VanishError::Decryption("decrypted secret is not utf-8".into()))?
			}
			None => {
				warn!(storage_key = %storage_key, "serving legacy unencrypted secret");
				String::from_utf8(stored)
					.map_err(|_| VanishError::Decryption("legacy secret is not utf-8".into()))?
			}
		};

		debug!(storage_key = %storage_key, "secret retrieved and deleted");
		Ok(Some(SecretString::new(plaintext)))
	}

	/// Report whether a token still points at a stored secret, without consuming it.
	#[instrument(skip(self, token), fields(store = self.store.name()))]
	pub async fn secret_exists(&self, token: &str) -> VanishResult<bool> {
		let token = Token::parse(token)?;
		Ok(self.store.exists(token.storage_key()).await?)
	}

	/// Probe the backing store.
	pub async fn ping(&self) -> VanishResult<()> {
		Ok(self.store.ping().await?)
	}
}
