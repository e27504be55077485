// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret API: create, preview and reveal.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::{header, HeaderMap, StatusCode},
	response::IntoResponse,
	Json,
};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, instrument};
use utoipa::ToSchema;
use vanish_common_secret::SecretString;
use vanish_core::Ttl;

use crate::api::AppState;
use crate::error::{ErrorResponse, ServerError};
use crate::liveness::with_liveness;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSecretRequest {
	/// The secret text. Never logged.
	#[serde(default)]
	#[schema(value_type = Option<String>)]
	pub secret: Option<SecretString>,
	/// One of `hour`, `day`, `week` or `two weeks` (case-insensitive).
	#[serde(default)]
	pub ttl: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateSecretResponse {
	/// Retrieval token; it contains the decryption key.
	pub token: String,
	pub link: String,
	#[schema(value_type = String)]
	pub ttl: Ttl,
	pub expires_in_secs: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewResponse {
	pub exists: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevealResponse {
	#[serde(serialize_with = "serialize_exposed")]
	#[schema(value_type = String)]
	pub secret: SecretString,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TtlOption {
	pub symbol: String,
	pub seconds: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TtlsResponse {
	pub ttls: Vec<TtlOption>,
}

/// Room for the JSON envelope around the secret: field names, the ttl symbol, whitespace.
const CREATE_ENVELOPE_BYTES: usize = 4096;

/// Request body limit for creating a secret of at most `max_secret_bytes`.
///
/// A control character escapes to six bytes (`\u0000`), so the largest
/// accepted secret still fits when every byte is escaped.
pub fn create_body_limit(max_secret_bytes: usize) -> usize {
	max_secret_bytes
		.saturating_mul(6)
		.saturating_add(CREATE_ENVELOPE_BYTES)
}

fn serialize_exposed<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(secret.expose())
}

/// Check a create request against the configured rules, returning the plaintext and lifetime.
fn validate_create(
	state: &AppState,
	request: CreateSecretRequest,
) -> Result<(SecretString, Ttl), ServerError> {
	let secret = request
		.secret
		.filter(|s| !s.is_empty())
		.ok_or_else(|| ServerError::BadRequest("secret must not be empty".to_string()))?;

	let max = state.secrets.max_secret_bytes;
	if secret.len() > max {
		return Err(ServerError::BadRequest(format!(
			"secret exceeds the maximum of {max} bytes"
		)));
	}

	let symbol = request
		.ttl
		.filter(|t| !t.trim().is_empty())
		.ok_or_else(|| ServerError::BadRequest("ttl is required".to_string()))?;
	let ttl: Ttl = symbol.parse()?;

	if !state.secrets.is_allowed(ttl) {
		return Err(ServerError::BadRequest(format!(
			"ttl '{ttl}' is not permitted on this server"
		)));
	}

	Ok((secret, ttl))
}

#[utoipa::path(
    post,
    path = "/api/v1/secrets",
    request_body = CreateSecretRequest,
    responses(
        (status = 201, description = "Secret stored", body = CreateSecretResponse),
        (status = 400, description = "Missing secret, unknown ttl or oversize secret", body = ErrorResponse),
        (status = 503, description = "Secret store unavailable", body = ErrorResponse)
    ),
    tag = "secrets"
)]
/// POST /api/v1/secrets - Encrypt and store a secret for one retrieval.
#[instrument(skip_all)]
pub async fn create_secret(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<CreateSecretRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let Json(request) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
	let (secret, ttl) = validate_create(&state, request)?;
	let links = state.links.for_request(&headers)?;

	let token = with_liveness(&state.engine, || {
		state.engine.set_secret(&secret, ttl.as_duration())
	})
	.await?
	.to_string();

	debug!(ttl = %ttl, "secret created");

	let response = CreateSecretResponse {
		link: links.link(&token),
		token,
		ttl,
		expires_in_secs: ttl.as_secs(),
	};
	Ok((StatusCode::CREATED, Json(response)))
}

/// Shared by the API and short-link preview handlers.
pub(crate) async fn preview(state: &AppState, token: &str) -> Result<PreviewResponse, ServerError> {
	let exists = with_liveness(&state.engine, || state.engine.secret_exists(token)).await?;
	if !exists {
		return Err(ServerError::secret_not_found());
	}
	Ok(PreviewResponse { exists })
}

/// Shared by the API and short-link reveal handlers.
pub(crate) async fn reveal(state: &AppState, token: &str) -> Result<impl IntoResponse, ServerError> {
	let secret = with_liveness(&state.engine, || state.engine.get_secret(token))
		.await?
		.ok_or_else(ServerError::secret_not_found)?;

	Ok((
		[(header::CACHE_CONTROL, "no-store")],
		Json(RevealResponse { secret }),
	))
}

#[utoipa::path(
    get,
    path = "/api/v1/secrets/{token}",
    params(("token" = String, Path, description = "Retrieval token")),
    responses(
        (status = 200, description = "Secret is waiting to be read", body = PreviewResponse),
        (status = 400, description = "Malformed token", body = ErrorResponse),
        (status = 404, description = "Secret already read or expired", body = ErrorResponse),
        (status = 503, description = "Secret store unavailable", body = ErrorResponse)
    ),
    tag = "secrets"
)]
/// GET /api/v1/secrets/{token} - Check a secret exists without consuming it.
#[instrument(skip_all)]
pub async fn preview_secret(
	State(state): State<AppState>,
	Path(token): Path<String>,
) -> Result<Json<PreviewResponse>, ServerError> {
	preview(&state, &token).await.map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/secrets/{token}",
    params(("token" = String, Path, description = "Retrieval token")),
    responses(
        (status = 200, description = "Secret revealed and deleted", body = RevealResponse),
        (status = 400, description = "Malformed token", body = ErrorResponse),
        (status = 404, description = "Secret already read, expired or undecryptable", body = ErrorResponse),
        (status = 503, description = "Secret store unavailable", body = ErrorResponse)
    ),
    tag = "secrets"
)]
/// POST /api/v1/secrets/{token} - Reveal a secret, deleting it.
#[instrument(skip_all)]
pub async fn reveal_secret(
	State(state): State<AppState>,
	Path(token): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	reveal(&state, &token).await
}

#[utoipa::path(
    get,
    path = "/api/v1/ttls",
    responses(
        (status = 200, description = "Lifetimes accepted by this server", body = TtlsResponse)
    ),
    tag = "secrets"
)]
/// GET /api/v1/ttls - List the permitted secret lifetimes.
pub async fn list_ttls(State(state): State<AppState>) -> Json<TtlsResponse> {
	let ttls = state
		.secrets
		.allowed_ttls
		.iter()
		.map(|ttl| TtlOption {
			symbol: ttl.symbol().to_string(),
			seconds: ttl.as_secs(),
		})
		.collect();

	Json(TtlsResponse { ttls })
}
