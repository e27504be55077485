// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the secret lifecycle engine.

use thiserror::Error;

/// Failure reported by a [`SecretStore`](crate::store::SecretStore) backend.
///
/// Every backend failure is a connectivity failure from the engine's point of
/// view; the backend name is kept for logs and health output.
#[derive(Debug, Clone, Error)]
#[error("{backend} store unavailable: {message}")]
pub struct StoreError {
	pub backend: &'static str,
	pub message: String,
}

impl StoreError {
	pub fn unavailable(backend: &'static str, message: impl Into<String>) -> Self {
		Self {
			backend,
			message: message.into(),
		}
	}
}

/// Errors surfaced by the engine to its callers.
#[derive(Debug, Error)]
pub enum VanishError {
	/// The backing store could not be reached. Never retried internally.
	#[error(transparent)]
	StoreUnavailable(#[from] StoreError),

	/// Ciphertext and key do not match, or either is corrupt.
	#[error("decryption failed: {0}")]
	Decryption(String),

	/// Missing secret text, unknown TTL symbol, malformed token and the like.
	#[error("invalid input: {0}")]
	InvalidInput(String),
}

impl VanishError {
	pub fn invalid_input(message: impl Into<String>) -> Self {
		Self::InvalidInput(message.into())
	}

	/// True when the error should read as "gone" to the caller.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::Decryption(_))
	}
}

/// Result type for engine operations.
pub type VanishResult<T> = Result<T, VanishError>;
