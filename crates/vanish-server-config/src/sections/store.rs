// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret store backend configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use vanish_common_secret::SecretString;

const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";
const DEFAULT_SQLITE_URL: &str = "sqlite:./vanish.db";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Which [`SecretStore`](vanish_core::SecretStore) backs the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
	/// In-process only; secrets vanish on restart.
	Memory,
	#[default]
	Redis,
	Sqlite,
}

impl StoreBackend {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Memory => "memory",
			Self::Redis => "redis",
			Self::Sqlite => "sqlite",
		}
	}
}

impl fmt::Display for StoreBackend {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for StoreBackend {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"memory" => Ok(Self::Memory),
			"redis" => Ok(Self::Redis),
			"sqlite" => Ok(Self::Sqlite),
			other => Err(format!(
				"unknown store backend '{other}' (expected memory, redis or sqlite)"
			)),
		}
	}
}

/// Store configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct StoreConfig {
	pub backend: StoreBackend,
	/// May embed credentials, hence secret.
	pub redis_url: SecretString,
	pub sqlite_url: String,
	pub sweep_interval_secs: u64,
}

impl StoreConfig {
	pub fn sweep_interval(&self) -> Duration {
		Duration::from_secs(self.sweep_interval_secs)
	}
}

impl Default for StoreConfig {
	fn default() -> Self {
		StoreConfigLayer::default().finalize()
	}
}

/// Store configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfigLayer {
	#[serde(default)]
	pub backend: Option<StoreBackend>,
	#[serde(default)]
	pub redis_url: Option<SecretString>,
	#[serde(default)]
	pub sqlite_url: Option<String>,
	#[serde(default)]
	pub sweep_interval_secs: Option<u64>,
}

impl StoreConfigLayer {
	pub fn merge(&mut self, other: StoreConfigLayer) {
		if other.backend.is_some() {
			self.backend = other.backend;
		}
		if other.redis_url.is_some() {
			self.redis_url = other.redis_url;
		}
		if other.sqlite_url.is_some() {
			self.sqlite_url = other.sqlite_url;
		}
		if other.sweep_interval_secs.is_some() {
			self.sweep_interval_secs = other.sweep_interval_secs;
		}
	}

	pub fn finalize(self) -> StoreConfig {
		StoreConfig {
			backend: self.backend.unwrap_or_default(),
			redis_url: self
				.redis_url
				.unwrap_or_else(|| SecretString::from(DEFAULT_REDIS_URL)),
			sqlite_url: self
				.sqlite_url
				.unwrap_or_else(|| DEFAULT_SQLITE_URL.to_string()),
			sweep_interval_secs: self
				.sweep_interval_secs
				.unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
		}
	}
}
