// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};
use vanish_core::Ttl;

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::secret_env::load_secret_env;
use crate::sections::{
	HttpConfigLayer, LinksConfigLayer, LogFormat, LoggingConfigLayer, SecretsConfigLayer,
	StoreBackend, StoreConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file contributes nothing.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/vanish/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: VANISH_SERVER_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			store: Some(load_store_from_env()?),
			secrets: Some(load_secrets_from_env()?),
			links: Some(load_links_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T: FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_list<T, E: std::fmt::Display>(
	name: &str,
	parse: impl Fn(&str) -> Result<T, E>,
) -> Result<Option<Vec<T>>, ConfigError> {
	let Some(raw) = env_var(name) else {
		return Ok(None);
	};

	raw.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(|s| {
			parse(s).map_err(|e| ConfigError::InvalidValue {
				key: name.to_string(),
				message: e.to_string(),
			})
		})
		.collect::<Result<Vec<_>, _>>()
		.map(Some)
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("VANISH_SERVER_HOST"),
		port: env_parse("VANISH_SERVER_PORT", "u16")?,
	})
}

fn load_store_from_env() -> Result<StoreConfigLayer, ConfigError> {
	let backend = match env_var("VANISH_SERVER_STORE_BACKEND") {
		Some(v) => Some(StoreBackend::from_str(&v).map_err(|message| {
			ConfigError::InvalidValue {
				key: "VANISH_SERVER_STORE_BACKEND".to_string(),
				message,
			}
		})?),
		None => None,
	};

	Ok(StoreConfigLayer {
		backend,
		redis_url: load_secret_env("VANISH_SERVER_REDIS_URL")?,
		sqlite_url: env_var("VANISH_SERVER_SQLITE_URL"),
		sweep_interval_secs: env_parse("VANISH_SERVER_SWEEP_INTERVAL_SECS", "u64")?,
	})
}

fn load_secrets_from_env() -> Result<SecretsConfigLayer, ConfigError> {
	Ok(SecretsConfigLayer {
		key_prefix: env_var("VANISH_SERVER_KEY_PREFIX"),
		allowed_ttls: env_list("VANISH_SERVER_ALLOWED_TTLS", Ttl::from_str)?,
		max_secret_bytes: env_parse("VANISH_SERVER_MAX_SECRET_BYTES", "usize")?,
	})
}

fn load_links_from_env() -> Result<LinksConfigLayer, ConfigError> {
	Ok(LinksConfigLayer {
		base_url: env_var("VANISH_SERVER_BASE_URL"),
		host_override: env_var("VANISH_SERVER_HOST_OVERRIDE"),
		url_prefix: env_var("VANISH_SERVER_URL_PREFIX"),
		force_https: env_bool("VANISH_SERVER_FORCE_HTTPS"),
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("VANISH_SERVER_LOG_FORMAT") {
		Some(v) => Some(LogFormat::from_str(&v).map_err(|message| ConfigError::InvalidValue {
			key: "VANISH_SERVER_LOG_FORMAT".to_string(),
			message,
		})?),
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: env_var("VANISH_SERVER_LOG_LEVEL"),
		format,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.store.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/config.toml");
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_parses_all_sections() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			r#"
			[http]
			port = 8443

			[store]
			backend = "memory"

			[secrets]
			key_prefix = "team-a"
			allowed_ttls = ["hour", "two weeks"]

			[links]
			url_prefix = "/share"
			force_https = false

			[logging]
			format = "json"
			"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(layer.http.unwrap().port, Some(8443));
		assert_eq!(layer.store.unwrap().backend, Some(StoreBackend::Memory));
		let secrets = layer.secrets.unwrap();
		assert_eq!(secrets.key_prefix.as_deref(), Some("team-a"));
		assert_eq!(secrets.allowed_ttls, Some(vec![Ttl::Hour, Ttl::TwoWeeks]));
		assert_eq!(layer.links.unwrap().force_https, Some(false));
		assert_eq!(layer.logging.unwrap().format, Some(LogFormat::Json));
	}

	#[test]
	fn test_toml_source_bad_syntax_is_parse_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "[http\nport = ").unwrap();

		let result = TomlSource::new(file.path()).load();
		assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
	}

	#[test]
	fn test_toml_source_unknown_ttl_is_parse_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "[secrets]\nallowed_ttls = [\"fortnight\"]\n").unwrap();

		let result = TomlSource::new(file.path()).load();
		assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
	}

	#[test]
	fn test_toml_ttls_match_env_spellings() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "[secrets]\nallowed_ttls = [\"Hour\", \" Two Weeks \"]\n").unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(
			layer.secrets.unwrap().allowed_ttls,
			Some(vec![Ttl::Hour, Ttl::TwoWeeks])
		);
	}

	#[test]
	fn test_env_parse_rejects_garbage() {
		std::env::set_var("VANISH_TEST_SOURCES_PORT", "not-a-port");
		let result = env_parse::<u16>("VANISH_TEST_SOURCES_PORT", "u16");
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
	}

	#[test]
	fn test_env_list_parses_ttls() {
		std::env::set_var("VANISH_TEST_SOURCES_TTLS", "hour, Day ,,week");
		let ttls = env_list("VANISH_TEST_SOURCES_TTLS", Ttl::from_str)
			.unwrap()
			.unwrap();
		assert_eq!(ttls, vec![Ttl::Hour, Ttl::Day, Ttl::Week]);
	}

	#[test]
	fn test_env_list_rejects_unknown_ttl() {
		std::env::set_var("VANISH_TEST_SOURCES_BAD_TTLS", "hour,fortnight");
		let result = env_list("VANISH_TEST_SOURCES_BAD_TTLS", Ttl::from_str);
		match result {
			Err(ConfigError::InvalidValue { key, message }) => {
				assert_eq!(key, "VANISH_TEST_SOURCES_BAD_TTLS");
				assert!(message.contains("fortnight"));
			}
			other => panic!("expected InvalidValue, got {other:?}"),
		}
	}

	#[test]
	fn test_env_bool_values() {
		std::env::set_var("VANISH_TEST_SOURCES_BOOL_TRUE", "TRUE");
		std::env::set_var("VANISH_TEST_SOURCES_BOOL_ONE", "1");
		std::env::set_var("VANISH_TEST_SOURCES_BOOL_FALSE", "false");
		assert_eq!(env_bool("VANISH_TEST_SOURCES_BOOL_TRUE"), Some(true));
		assert_eq!(env_bool("VANISH_TEST_SOURCES_BOOL_ONE"), Some(true));
		assert_eq!(env_bool("VANISH_TEST_SOURCES_BOOL_FALSE"), Some(false));
		assert_eq!(env_bool("VANISH_TEST_SOURCES_BOOL_UNSET"), None);
	}
}
