// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the Vanish server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`VANISH_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use vanish_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod secret_env;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use secret_env::load_secret_env;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};
use vanish_core::TOKEN_SEPARATOR;

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub store: StoreConfig,
	pub secrets: SecretsConfig,
	pub links: LinksConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`VANISH_SERVER_*`)
/// 2. Config file (`/etc/vanish/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		http: layer.http.unwrap_or_default().finalize(),
		store: layer.store.unwrap_or_default().finalize(),
		secrets: layer.secrets.unwrap_or_default().finalize(),
		links: layer.links.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		host = %config.http.host,
		port = config.http.port,
		store = %config.store.backend,
		key_prefix = %config.secrets.key_prefix,
		allowed_ttls = config.secrets.allowed_ttls.len(),
		base_url = config.links.base_url.as_deref().unwrap_or("<per-request>"),
		"Server configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.secrets.key_prefix.contains(TOKEN_SEPARATOR) {
		return Err(ConfigError::Validation(format!(
			"secrets.key_prefix must not contain '{TOKEN_SEPARATOR}', \
			 it separates the storage key from the encryption key in tokens"
		)));
	}

	if config.secrets.allowed_ttls.is_empty() {
		return Err(ConfigError::Validation(
			"secrets.allowed_ttls must list at least one ttl".to_string(),
		));
	}

	if config.secrets.max_secret_bytes == 0 {
		return Err(ConfigError::Validation(
			"secrets.max_secret_bytes must be greater than zero".to_string(),
		));
	}

	if config.store.backend != StoreBackend::Redis && config.store.sweep_interval_secs == 0 {
		return Err(ConfigError::Validation(
			"store.sweep_interval_secs must be greater than zero".to_string(),
		));
	}

	if let Some(base_url) = &config.links.base_url {
		if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
			return Err(ConfigError::Validation(format!(
				"links.base_url '{base_url}' must start with http:// or https://"
			)));
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use vanish_core::Ttl;

	#[test]
	fn test_defaults_are_valid() {
		let config = finalize(ServerConfigLayer::default()).unwrap();
		assert_eq!(config.socket_addr(), "0.0.0.0:5000");
		assert_eq!(config.store.backend, StoreBackend::Redis);
		assert_eq!(config.secrets.allowed_ttls, Ttl::ALL.to_vec());
	}

	#[test]
	fn test_prefix_with_separator_rejected() {
		let layer = ServerConfigLayer {
			secrets: Some(SecretsConfigLayer {
				key_prefix: Some("team~a".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		let err = finalize(layer).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
		assert!(err.to_string().contains("key_prefix"));
	}

	#[test]
	fn test_empty_ttl_list_rejected() {
		let layer = ServerConfigLayer {
			secrets: Some(SecretsConfigLayer {
				allowed_ttls: Some(Vec::new()),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(matches!(finalize(layer), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_zero_sweep_interval_rejected_for_sqlite() {
		let layer = ServerConfigLayer {
			store: Some(StoreConfigLayer {
				backend: Some(StoreBackend::Sqlite),
				sweep_interval_secs: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(matches!(finalize(layer), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_zero_sweep_interval_ignored_for_redis() {
		let layer = ServerConfigLayer {
			store: Some(StoreConfigLayer {
				backend: Some(StoreBackend::Redis),
				sweep_interval_secs: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(finalize(layer).is_ok());
	}

	#[test]
	fn test_relative_base_url_rejected() {
		let layer = ServerConfigLayer {
			links: Some(LinksConfigLayer {
				base_url: Some("vanish.example.com".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(matches!(finalize(layer), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_socket_addr() {
		let config = ServerConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
			},
			..Default::default()
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}

	#[test]
	fn test_file_layer_resolves() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			"[store]\nbackend = \"sqlite\"\nsqlite_url = \"sqlite:/var/lib/vanish/secrets.db\"\n"
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		let config = finalize(layer).unwrap();
		assert_eq!(config.store.backend, StoreBackend::Sqlite);
		assert_eq!(config.store.sqlite_url, "sqlite:/var/lib/vanish/secrets.db");
	}
}
