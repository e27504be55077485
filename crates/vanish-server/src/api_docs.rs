// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI document served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::routes::health::{HealthResponse, HealthStatus};
use crate::routes::secrets::{
	CreateSecretRequest, CreateSecretResponse, PreviewResponse, RevealResponse, TtlOption,
	TtlsResponse,
};

#[derive(OpenApi)]
#[openapi(
	info(
		title = "Vanish",
		description = "Share a secret once. The first read deletes it."
	),
	paths(
		crate::routes::secrets::create_secret,
		crate::routes::secrets::preview_secret,
		crate::routes::secrets::reveal_secret,
		crate::routes::secrets::list_ttls,
		crate::routes::share::preview_share_link,
		crate::routes::share::reveal_share_link,
		crate::routes::health::health_check,
	),
	components(schemas(
		CreateSecretRequest,
		CreateSecretResponse,
		PreviewResponse,
		RevealResponse,
		TtlOption,
		TtlsResponse,
		HealthResponse,
		HealthStatus,
		ErrorResponse,
	)),
	tags(
		(name = "secrets", description = "Create and consume one-time secrets"),
		(name = "share", description = "Targets of generated share links"),
		(name = "health", description = "Service health")
	)
)]
pub struct ApiDoc;
