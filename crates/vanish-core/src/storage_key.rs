// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage key generation.

use uuid::Uuid;

use crate::error::{VanishError, VanishResult};
use crate::token::TOKEN_SEPARATOR;

/// Default namespace prepended to every storage key.
pub const DEFAULT_KEY_PREFIX: &str = "vanish";

/// Produces unique storage keys, optionally namespaced with a prefix.
///
/// Keys are a UUID v4 rendered as 32 lowercase hex characters. With 122 bits
/// of randomness no collision check is made.
#[derive(Debug, Clone)]
pub struct StorageKeyGenerator {
	prefix: String,
}

impl StorageKeyGenerator {
	/// Create a generator; the prefix must not contain the token separator.
	pub fn new(prefix: impl Into<String>) -> VanishResult<Self> {
		let prefix = prefix.into();
		if prefix.contains(TOKEN_SEPARATOR) {
			return Err(VanishError::invalid_input(format!(
				"storage key prefix must not contain '{TOKEN_SEPARATOR}'"
			)));
		}
		Ok(Self { prefix })
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn generate(&self) -> String {
		format!("{}{}", self.prefix, Uuid::new_v4().simple())
	}
}

impl Default for StorageKeyGenerator {
	fn default() -> Self {
		Self {
			prefix: DEFAULT_KEY_PREFIX.to_string(),
		}
	}
}
