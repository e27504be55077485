// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tokio::time::Instant;
use utoipa::ToSchema;

use crate::api::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
	pub status: HealthStatus,
	/// Backend label, e.g. `redis`.
	pub store: String,
	pub version: String,
	pub duration_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Secret store reachable", body = HealthResponse),
        (status = 503, description = "Secret store unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Ping the secret store.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let start = Instant::now();
	let result = state.engine.ping().await;
	let duration_ms = start.elapsed().as_millis() as u64;

	let (http_status, status, error) = match result {
		Ok(()) => (StatusCode::OK, HealthStatus::Healthy, None),
		Err(e) => {
			tracing::warn!(error = %e, "health check failed");
			(
				StatusCode::SERVICE_UNAVAILABLE,
				HealthStatus::Unhealthy,
				Some("secret store unavailable".to_string()),
			)
		}
	};

	let response = HealthResponse {
		status,
		store: state.engine.store_name().to_string(),
		version: env!("CARGO_PKG_VERSION").to_string(),
		duration_ms,
		error,
	};

	(http_status, Json(response))
}
