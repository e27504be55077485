// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections. Each has a resolved form and a partial `*Layer`
//! form that merges field by field.

mod http;
mod links;
mod logging;
mod secrets;
mod store;

pub use http::{HttpConfig, HttpConfigLayer};
pub use links::{LinksConfig, LinksConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use secrets::{SecretsConfig, SecretsConfigLayer};
pub use store::{StoreBackend, StoreConfig, StoreConfigLayer};
