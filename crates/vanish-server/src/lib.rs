// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Vanish one-time secret server.
//!
//! This crate exposes the secret lifecycle engine over HTTP: JSON endpoints
//! to create, preview and reveal secrets, share-link generation, store
//! liveness composition and a log writer that masks token keys.

pub mod api;
pub mod api_docs;
pub mod error;
pub mod links;
pub mod liveness;
pub mod redact;
pub mod routes;
pub mod store;
pub mod version;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::{ErrorResponse, ServerError};
pub use links::LinkBuilder;
pub use liveness::{startup_probe, with_liveness};
pub use redact::RedactingMakeWriter;
pub use store::{connect_store, ConnectedStore};
pub use vanish_server_config::ServerConfig;
