// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP-facing error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use vanish_core::VanishError;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
	/// Machine-readable code: `invalid_input`, `not_found`, `store_unavailable` or `internal`.
	pub error: String,
	pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("bad request: {0}")]
	BadRequest(String),
	#[error("not found: {0}")]
	NotFound(String),
	#[error("service unavailable: {0}")]
	ServiceUnavailable(String),
	#[error("internal error: {0}")]
	Internal(String),
}

impl ServerError {
	pub fn status(&self) -> StatusCode {
		match self {
			ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ServerError::NotFound(_) => StatusCode::NOT_FOUND,
			ServerError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn code(&self) -> &'static str {
		match self {
			ServerError::BadRequest(_) => "invalid_input",
			ServerError::NotFound(_) => "not_found",
			ServerError::ServiceUnavailable(_) => "store_unavailable",
			ServerError::Internal(_) => "internal",
		}
	}

	pub fn secret_not_found() -> Self {
		ServerError::NotFound("secret not found".to_string())
	}
}

impl From<VanishError> for ServerError {
	fn from(e: VanishError) -> Self {
		match e {
			VanishError::StoreUnavailable(store) => {
				tracing::error!(backend = store.backend, error = %store, "secret store unavailable");
				ServerError::ServiceUnavailable("secret store unavailable".to_string())
			}
			// Undecryptable reads as gone; a forged key must not learn otherwise.
			VanishError::Decryption(reason) => {
				tracing::debug!(reason = %reason, "decryption failed, reporting not found");
				ServerError::secret_not_found()
			}
			VanishError::InvalidInput(message) => ServerError::BadRequest(message),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let status = self.status();
		let message = match &self {
			ServerError::BadRequest(msg)
			| ServerError::NotFound(msg)
			| ServerError::ServiceUnavailable(msg)
			| ServerError::Internal(msg) => msg.clone(),
		};

		let body = ErrorResponse {
			error: self.code().to_string(),
			message,
		};
		(status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use vanish_core::StoreError;

	#[test]
	fn store_unavailable_maps_to_503() {
		let err: ServerError =
			VanishError::from(StoreError::unavailable("redis", "connection refused")).into();
		assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(err.code(), "store_unavailable");
	}

	#[test]
	fn decryption_maps_to_404() {
		let err: ServerError = VanishError::Decryption("tag mismatch".into()).into();
		assert_eq!(err.status(), StatusCode::NOT_FOUND);
		assert_eq!(err.code(), "not_found");
		assert!(!err.to_string().contains("tag mismatch"));
	}

	#[test]
	fn invalid_input_maps_to_400() {
		let err: ServerError = VanishError::invalid_input("unrecognized ttl 'fortnight'").into();
		assert_eq!(err.status(), StatusCode::BAD_REQUEST);
		assert!(err.to_string().contains("fortnight"));
	}

	#[tokio::test]
	async fn response_body_has_error_and_message() {
		let response = ServerError::BadRequest("secret must not be empty".into()).into_response();
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);

		let body = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
		assert_eq!(json["error"], "invalid_input");
		assert_eq!(json["message"], "secret must not be empty");
	}
}
