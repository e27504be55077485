// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;

use axum::{
	extract::DefaultBodyLimit,
	routing::{get, post},
	Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use vanish_core::{SecretEngine, SecretStore, StorageKeyGenerator, VanishResult};
use vanish_server_config::{SecretsConfig, ServerConfig};

use crate::api_docs::ApiDoc;
use crate::links::LinkBuilder;
use crate::routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub engine: SecretEngine,
	pub secrets: Arc<SecretsConfig>,
	pub links: Arc<LinkBuilder>,
}

/// Creates the application state around an already connected store.
pub fn create_app_state(store: Arc<dyn SecretStore>, config: &ServerConfig) -> VanishResult<AppState> {
	let keys = StorageKeyGenerator::new(config.secrets.key_prefix.clone())?;

	Ok(AppState {
		engine: SecretEngine::new(store, keys),
		secrets: Arc::new(config.secrets.clone()),
		links: Arc::new(LinkBuilder::new(config.links.clone())),
	})
}

pub fn create_router(state: AppState) -> Router {
	let create_limit = routes::secrets::create_body_limit(state.secrets.max_secret_bytes);

	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/v1/ttls", get(routes::secrets::list_ttls))
		.route(
			"/api/v1/secrets",
			post(routes::secrets::create_secret).layer(DefaultBodyLimit::max(create_limit)),
		)
		.route(
			"/api/v1/secrets/{token}",
			get(routes::secrets::preview_secret).post(routes::secrets::reveal_secret),
		)
		.route(
			"/s/{token}",
			get(routes::share::preview_share_link).post(routes::share::reveal_share_link),
		)
		.with_state(state)
		.merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
		.layer(TraceLayer::new_for_http())
}
