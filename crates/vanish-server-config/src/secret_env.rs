// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret loading from environment variables with `*_FILE` indirection.
//!
//! `NAME_FILE` wins over `NAME` so that container secret mounts override a
//! stray inline value.

use vanish_common_secret::SecretString;

use crate::error::ConfigError;

/// Load a secret from `<name>_FILE` (file contents, trimmed) or `<name>`.
///
/// Returns `Ok(None)` when neither variable is set or the value is empty.
pub fn load_secret_env(name: &str) -> Result<Option<SecretString>, ConfigError> {
	let file_var = format!("{name}_FILE");
	if let Some(path) = std::env::var(&file_var).ok().filter(|p| !p.is_empty()) {
		let content = std::fs::read_to_string(&path)
			.map_err(|e| ConfigError::Secret(format!("{file_var}: cannot read '{path}': {e}")))?;
		let trimmed = content.trim();
		if trimmed.is_empty() {
			return Err(ConfigError::Secret(format!("{file_var}: '{path}' is empty")));
		}
		return Ok(Some(SecretString::new(trimmed.to_string())));
	}

	Ok(std::env::var(name)
		.ok()
		.filter(|v| !v.is_empty())
		.map(SecretString::new))
}
