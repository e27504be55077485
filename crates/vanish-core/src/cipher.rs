// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-secret authenticated encryption.
//!
//! Every call to [`encrypt`] draws a fresh AES-256-GCM key and nonce from the
//! OS RNG. The key never touches the store: it leaves the process inside the
//! token, rendered as unpadded URL-safe base64.
//!
//! Stored layout: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use std::fmt;

use aes_gcm::{
	aead::{Aead, KeyInit, OsRng},
	Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{VanishError, VanishResult};

/// Size of encryption keys in bytes (256 bits for AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Length of a key once rendered as unpadded base64url.
pub const ENCODED_KEY_LEN: usize = 43;

/// A per-secret symmetric key.
#[derive(Clone)]
pub struct EncryptionKey(Zeroizing<[u8; KEY_SIZE]>);

impl EncryptionKey {
	/// Generate a random key.
	pub fn generate() -> Self {
		let mut key = Zeroizing::new([0u8; KEY_SIZE]);
		OsRng.fill_bytes(key.as_mut());
		Self(key)
	}

	/// Render the key for embedding in a token.
	pub fn to_url_safe(&self) -> String {
		URL_SAFE_NO_PAD.encode(self.0.as_slice())
	}

	/// Parse a key taken from a token.
	pub fn from_url_safe(encoded: &str) -> VanishResult<Self> {
		let bytes = Zeroizing::new(
			URL_SAFE_NO_PAD
				.decode(encoded)
				.map_err(|_| VanishError::Decryption("encryption key is not valid base64url".into()))?,
		);

		if bytes.len() != KEY_SIZE {
			return Err(VanishError::Decryption(format!(
				"encryption key has {} bytes, expected {KEY_SIZE}",
				bytes.len()
			)));
		}

		let mut key = Zeroizing::new([0u8; KEY_SIZE]);
		key.copy_from_slice(&bytes);
		Ok(Self(key))
	}

	fn cipher(&self) -> Aes256Gcm {
		Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(self.0.as_slice()))
	}
}

impl fmt::Debug for EncryptionKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "EncryptionKey({})", vanish_common_secret::REDACTED)
	}
}

fn generate_nonce() -> [u8; NONCE_SIZE] {
	let mut nonce = [0u8; NONCE_SIZE];
	OsRng.fill_bytes(&mut nonce);
	nonce
}

/// Encrypt `plaintext` under a freshly generated key.
///
/// Returns the stored representation and the key needed to read it back.
pub fn encrypt(plaintext: &[u8]) -> VanishResult<(Vec<u8>, EncryptionKey)> {
	let key = EncryptionKey::generate();
	let nonce_bytes = generate_nonce();

	let ciphertext = key
		.cipher()
		.encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
		.map_err(|e| VanishError::InvalidInput(format!("secret cannot be encrypted: {e}")))?;

	let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
	sealed.extend_from_slice(&nonce_bytes);
	sealed.extend_from_slice(&ciphertext);
	Ok((sealed, key))
}

/// Decrypt a value produced by [`encrypt`].
pub fn decrypt(sealed: &[u8], key: &EncryptionKey) -> VanishResult<Zeroizing<Vec<u8>>> {
	if sealed.len() < NONCE_SIZE + TAG_SIZE {
		return Err(VanishError::Decryption(format!(
			"ciphertext too short: {} bytes",
			sealed.len()
		)));
	}

	let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
	let plaintext = key
		.cipher()
		.decrypt(Nonce::from_slice(nonce), ciphertext)
		.map_err(|e| VanishError::Decryption(format!("secret decryption failed: {e}")))?;

	Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn key_generation_produces_unique_keys() {
		let key1 = EncryptionKey::generate();
		let key2 = EncryptionKey::generate();
		assert_ne!(key1.to_url_safe(), key2.to_url_safe());
	}

	#[test]
	fn encoded_key_is_url_safe() {
		let encoded = EncryptionKey::generate().to_url_safe();
		assert_eq!(encoded.len(), ENCODED_KEY_LEN);
		assert!(encoded
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
	}

	#[test]
	fn key_survives_url_safe_roundtrip() {
		let key = EncryptionKey::generate();
		let parsed = EncryptionKey::from_url_safe(&key.to_url_safe()).unwrap();
		assert_eq!(key.to_url_safe(), parsed.to_url_safe());
	}

	#[test]
	fn debug_does_not_print_key_material() {
		let key = EncryptionKey::generate();
		let rendered = format!("{key:?}");
		assert!(!rendered.contains(&key.to_url_safe()));
	}

	#[test]
	fn secret_encryption_roundtrip() {
		let plaintext = b"super secret value";

		let (sealed, key) = encrypt(plaintext).unwrap();
		let decrypted = decrypt(&sealed, &key).unwrap();

		assert_eq!(plaintext.as_slice(), decrypted.as_slice());
	}

	#[test]
	fn sealed_value_has_nonce_and_tag_overhead() {
		let (sealed, _) = encrypt(b"abc").unwrap();
		assert_eq!(sealed.len(), NONCE_SIZE + 3 + TAG_SIZE);
	}

	#[test]
	fn wrong_key_fails_decryption() {
		let (sealed, _) = encrypt(b"secret").unwrap();
		let other = EncryptionKey::generate();

		let result = decrypt(&sealed, &other);
		assert!(matches!(result, Err(VanishError::Decryption(_))));
	}

	#[test]
	fn tampered_ciphertext_fails() {
		let (mut sealed, key) = encrypt(b"secret").unwrap();
		let last = sealed.len() - 1;
		sealed[last] ^= 0xFF;

		assert!(decrypt(&sealed, &key).is_err());
	}

	#[test]
	fn truncated_ciphertext_fails() {
		let (sealed, key) = encrypt(b"secret").unwrap();
		assert!(decrypt(&sealed[..NONCE_SIZE], &key).is_err());
		assert!(decrypt(&[], &key).is_err());
	}

	#[test]
	fn malformed_keys_are_rejected() {
		assert!(EncryptionKey::from_url_safe("not base64!").is_err());
		assert!(EncryptionKey::from_url_safe("").is_err());
		assert!(EncryptionKey::from_url_safe("c2hvcnQ").is_err());
	}

	proptest! {
		#[test]
		fn prop_secret_encryption_roundtrip(plaintext in proptest::collection::vec(any::<u8>(), 0..10000)) {
			let (sealed, key) = encrypt(&plaintext).unwrap();
			let decrypted = decrypt(&sealed, &key).unwrap();

			prop_assert_eq!(plaintext, decrypted.as_slice());
		}

		#[test]
		fn prop_ciphertext_never_contains_plaintext(plaintext in "[a-zA-Z0-9 ]{16,256}") {
			let (sealed, _) = encrypt(plaintext.as_bytes()).unwrap();

			prop_assert!(!sealed
				.windows(plaintext.len())
				.any(|window| window == plaintext.as_bytes()));
		}

		#[test]
		fn prop_same_plaintext_encrypts_differently(plaintext in proptest::collection::vec(any::<u8>(), 1..1000)) {
			let (sealed1, key1) = encrypt(&plaintext).unwrap();
			let (sealed2, key2) = encrypt(&plaintext).unwrap();

			prop_assert_ne!(sealed1, sealed2);
			prop_assert_ne!(key1.to_url_safe(), key2.to_url_safe());
		}

		#[test]
		fn prop_tampered_ciphertext_fails_decryption(
			plaintext in proptest::collection::vec(any::<u8>(), 1..1000),
			tamper_idx in 0usize..1000usize,
		) {
			let (mut sealed, key) = encrypt(&plaintext).unwrap();
			let idx = tamper_idx % sealed.len();
			sealed[idx] ^= 0xFF;

			prop_assert!(decrypt(&sealed, &key).is_err());
		}
	}
}
