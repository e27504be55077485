// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Retrieval token codec.
//!
//! A token is `<storage_key>~<encryption_key>`. The separator never occurs in
//! the hex storage-key alphabet or in base64url, so splitting on the first
//! `~` is unambiguous. A token without a separator is a legacy bare storage
//! key whose stored value is plaintext.

use std::fmt;
use std::str::FromStr;

use crate::error::{VanishError, VanishResult};

/// Reserved character joining the two halves of a token.
pub const TOKEN_SEPARATOR: char = '~';

/// A decoded retrieval token.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
	storage_key: String,
	encryption_key: Option<String>,
}

impl Token {
	pub fn new(storage_key: impl Into<String>, encryption_key: impl Into<String>) -> Self {
		Self {
			storage_key: storage_key.into(),
			encryption_key: Some(encryption_key.into()),
		}
	}

	/// A token for an entry stored without encryption.
	pub fn legacy(storage_key: impl Into<String>) -> Self {
		Self {
			storage_key: storage_key.into(),
			encryption_key: None,
		}
	}

	pub fn storage_key(&self) -> &str {
		&self.storage_key
	}

	pub fn encryption_key(&self) -> Option<&str> {
		self.encryption_key.as_deref()
	}

	pub fn is_legacy(&self) -> bool {
		self.encryption_key.is_none()
	}

	/// Parse a token, rejecting ones with no storage key.
	pub fn parse(token: &str) -> VanishResult<Self> {
		let (storage_key, encryption_key) = decode(token);
		if storage_key.is_empty() {
			return Err(VanishError::invalid_input("token has no storage key"));
		}
		Ok(Self {
			storage_key: storage_key.to_string(),
			encryption_key: encryption_key.map(str::to_string),
		})
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.encryption_key {
			Some(key) => f.write_str(&encode(&self.storage_key, key)),
			None => f.write_str(&self.storage_key),
		}
	}
}

// Tokens carry key material; only the storage key is printed.
impl fmt::Debug for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Token")
			.field("storage_key", &self.storage_key)
			.field("encrypted", &self.encryption_key.is_some())
			.finish()
	}
}

impl FromStr for Token {
	type Err = VanishError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// Join a storage key and an encryption key into a token string.
pub fn encode(storage_key: &str, encryption_key: &str) -> String {
	let mut token = String::with_capacity(storage_key.len() + 1 + encryption_key.len());
	token.push_str(storage_key);
	token.push(TOKEN_SEPARATOR);
	token.push_str(encryption_key);
	token
}

/// Split a token on the first separator.
///
/// Returns the storage key and, when present, the encryption key.
pub fn decode(token: &str) -> (&str, Option<&str>) {
	match token.split_once(TOKEN_SEPARATOR) {
		Some((storage_key, encryption_key)) => (storage_key, Some(encryption_key)),
		None => (token, None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn encode_joins_with_separator() {
		assert_eq!(encode("vanishabc", "KEY"), "vanishabc~KEY");
	}

	#[test]
	fn decode_without_separator_is_legacy() {
		assert_eq!(decode("deadbeef"), ("deadbeef", None));
	}

	#[test]
	fn decode_splits_on_first_separator_only() {
		assert_eq!(decode("abc~def~ghi"), ("abc", Some("def~ghi")));
	}

	#[test]
	fn decode_keeps_empty_key_part() {
		assert_eq!(decode("abc~"), ("abc", Some("")));
	}

	#[test]
	fn parse_rejects_missing_storage_key() {
		assert!(matches!(Token::parse(""), Err(VanishError::InvalidInput(_))));
		assert!(matches!(Token::parse("~key"), Err(VanishError::InvalidInput(_))));
	}

	#[test]
	fn parse_legacy_token() {
		let token: Token = "0123abcd".parse().unwrap();
		assert!(token.is_legacy());
		assert_eq!(token.storage_key(), "0123abcd");
		assert_eq!(token.to_string(), "0123abcd");
	}

	#[test]
	fn debug_omits_encryption_key() {
		let token = Token::new("vanish0123", "c2VjcmV0LWtleS1tYXRlcmlhbA");
		let rendered = format!("{token:?}");
		assert!(rendered.contains("vanish0123"));
		assert!(!rendered.contains("c2VjcmV0LWtleS1tYXRlcmlhbA"));
	}

	proptest! {
		#[test]
		fn prop_decode_inverts_encode(
			storage_key in "[a-z0-9:]{0,48}",
			encryption_key in "[A-Za-z0-9_~-]{0,64}",
		) {
			let token = encode(&storage_key, &encryption_key);
			prop_assert_eq!(decode(&token), (storage_key.as_str(), Some(encryption_key.as_str())));
		}

		#[test]
		fn prop_token_display_roundtrips(
			storage_key in "[a-z0-9]{1,48}",
			encryption_key in "[A-Za-z0-9_-]{43}",
		) {
			let token = Token::new(storage_key, encryption_key);
			let parsed = Token::parse(&token.to_string()).unwrap();
			prop_assert_eq!(parsed, token);
		}

		#[test]
		fn prop_separator_free_token_is_storage_key(storage_key in "[a-z0-9]{1,64}") {
			prop_assert_eq!(decode(&storage_key), (storage_key.as_str(), None));
		}
	}
}
