// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret acceptance rules: storage namespace, permitted lifetimes, size cap.

use serde::Deserialize;
use vanish_core::{Ttl, DEFAULT_KEY_PREFIX};

const DEFAULT_MAX_SECRET_BYTES: usize = 64 * 1024;

/// Secrets configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct SecretsConfig {
	pub key_prefix: String,
	pub allowed_ttls: Vec<Ttl>,
	pub max_secret_bytes: usize,
}

impl SecretsConfig {
	pub fn is_allowed(&self, ttl: Ttl) -> bool {
		self.allowed_ttls.contains(&ttl)
	}
}

impl Default for SecretsConfig {
	fn default() -> Self {
		SecretsConfigLayer::default().finalize()
	}
}

/// Secrets configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsConfigLayer {
	#[serde(default)]
	pub key_prefix: Option<String>,
	#[serde(default)]
	pub allowed_ttls: Option<Vec<Ttl>>,
	#[serde(default)]
	pub max_secret_bytes: Option<usize>,
}

impl SecretsConfigLayer {
	pub fn merge(&mut self, other: SecretsConfigLayer) {
		if other.key_prefix.is_some() {
			self.key_prefix = other.key_prefix;
		}
		if other.allowed_ttls.is_some() {
			self.allowed_ttls = other.allowed_ttls;
		}
		if other.max_secret_bytes.is_some() {
			self.max_secret_bytes = other.max_secret_bytes;
		}
	}

	pub fn finalize(self) -> SecretsConfig {
		let mut allowed_ttls = self.allowed_ttls.unwrap_or_else(|| Ttl::ALL.to_vec());
		allowed_ttls.sort_by_key(|ttl| ttl.as_secs());
		allowed_ttls.dedup();

		SecretsConfig {
			key_prefix: self
				.key_prefix
				.unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
			allowed_ttls,
			max_secret_bytes: self.max_secret_bytes.unwrap_or(DEFAULT_MAX_SECRET_BYTES),
		}
	}
}
