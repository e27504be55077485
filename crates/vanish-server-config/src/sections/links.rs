// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Share-link construction settings.

use serde::Deserialize;

/// Links configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct LinksConfig {
	/// Absolute origin for links, e.g. `https://vanish.example.com`. When
	/// unset the origin is derived per request.
	pub base_url: Option<String>,
	/// Host used instead of the request `Host` header.
	pub host_override: Option<String>,
	/// Path prefix when served below the root, normalized to `/prefix` or `""`.
	pub url_prefix: String,
	pub force_https: bool,
}

impl Default for LinksConfig {
	fn default() -> Self {
		LinksConfigLayer::default().finalize()
	}
}

/// Links configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinksConfigLayer {
	#[serde(default)]
	pub base_url: Option<String>,
	#[serde(default)]
	pub host_override: Option<String>,
	#[serde(default)]
	pub url_prefix: Option<String>,
	#[serde(default)]
	pub force_https: Option<bool>,
}

impl LinksConfigLayer {
	pub fn merge(&mut self, other: LinksConfigLayer) {
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
		if other.host_override.is_some() {
			self.host_override = other.host_override;
		}
		if other.url_prefix.is_some() {
			self.url_prefix = other.url_prefix;
		}
		if other.force_https.is_some() {
			self.force_https = other.force_https;
		}
	}

	pub fn finalize(self) -> LinksConfig {
		LinksConfig {
			base_url: self
				.base_url
				.map(|url| url.trim_end_matches('/').to_string())
				.filter(|url| !url.is_empty()),
			host_override: self.host_override.filter(|host| !host.is_empty()),
			url_prefix: normalize_prefix(self.url_prefix.as_deref().unwrap_or("")),
			force_https: self.force_https.unwrap_or(true),
		}
	}
}

fn normalize_prefix(raw: &str) -> String {
	let trimmed = raw.trim().trim_matches('/');
	if trimmed.is_empty() {
		String::new()
	} else {
		format!("/{trimmed}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_defaults() {
		let config = LinksConfigLayer::default().finalize();
		assert!(config.base_url.is_none());
		assert!(config.host_override.is_none());
		assert_eq!(config.url_prefix, "");
		assert!(config.force_https);
	}

	#[test]
	fn test_prefix_normalization() {
		assert_eq!(normalize_prefix(""), "");
		assert_eq!(normalize_prefix("/"), "");
		assert_eq!(normalize_prefix("secrets"), "/secrets");
		assert_eq!(normalize_prefix("/secrets/"), "/secrets");
		assert_eq!(normalize_prefix("/a/b"), "/a/b");
	}

	#[test]
	fn test_base_url_trailing_slash_trimmed() {
		let config = LinksConfigLayer {
			base_url: Some("https://vanish.example.com/".to_string()),
			..Default::default()
		}
		.finalize();
		assert_eq!(
			config.base_url.as_deref(),
			Some("https://vanish.example.com")
		);
	}

	proptest! {
		#[test]
		fn prefix_never_ends_with_slash(raw in "[/a-z]{0,16}") {
			let prefix = normalize_prefix(&raw);
			prop_assert!(!prefix.ends_with('/'));
			prop_assert!(prefix.is_empty() || prefix.starts_with('/'));
		}
	}
}
