// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Short share-link endpoints (`/s/{token}`), the target of generated links.
//!
//! Viewing the link is a GET and only previews; revealing takes an explicit
//! POST, so link-unfurling bots cannot burn a secret.

use axum::{
	extract::{Path, State},
	response::IntoResponse,
	Json,
};
use tracing::instrument;

use crate::api::AppState;
use crate::error::ServerError;
use crate::routes::secrets::{preview, reveal, PreviewResponse};

#[utoipa::path(
    get,
    path = "/s/{token}",
    params(("token" = String, Path, description = "Retrieval token")),
    responses(
        (status = 200, description = "Secret is waiting to be read", body = PreviewResponse),
        (status = 404, description = "Secret already read or expired", body = crate::error::ErrorResponse)
    ),
    tag = "share"
)]
/// GET /s/{token} - Preview a shared secret.
#[instrument(skip_all)]
pub async fn preview_share_link(
	State(state): State<AppState>,
	Path(token): Path<String>,
) -> Result<Json<PreviewResponse>, ServerError> {
	preview(&state, &token).await.map(Json)
}

#[utoipa::path(
    post,
    path = "/s/{token}",
    params(("token" = String, Path, description = "Retrieval token")),
    responses(
        (status = 200, description = "Secret revealed and deleted", body = crate::routes::secrets::RevealResponse),
        (status = 404, description = "Secret already read, expired or undecryptable", body = crate::error::ErrorResponse)
    ),
    tag = "share"
)]
/// POST /s/{token} - Reveal a shared secret, deleting it.
#[instrument(skip_all)]
pub async fn reveal_share_link(
	State(state): State<AppState>,
	Path(token): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
	reveal(&state, &token).await
}
