// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Share-link construction.
//!
//! A link is `origin + url_prefix + "/s/" + token`, with the token
//! percent-encoded as a single path segment. The origin comes from the
//! configured `base_url` when present, otherwise from the host override or
//! the request's `Host` header.

use axum::http::{header, HeaderMap};
use url::Url;
use vanish_server_config::LinksConfig;

use crate::error::ServerError;

/// Path segment under which share links are served.
pub const SHARE_SEGMENT: &str = "s";

#[derive(Debug, Clone)]
pub struct LinkBuilder {
	config: LinksConfig,
}

impl LinkBuilder {
	pub fn new(config: LinksConfig) -> Self {
		Self { config }
	}

	/// Resolve the link base for a request. Resolved before a secret is
	/// stored so a request that cannot be answered with a link stores nothing.
	pub fn for_request(&self, headers: &HeaderMap) -> Result<ShareLinks, ServerError> {
		let origin = self.origin(headers)?;
		let mut base = Url::parse(&origin)
			.map_err(|e| ServerError::BadRequest(format!("cannot build link from '{origin}': {e}")))?;

		base.path_segments_mut()
			.map_err(|_| ServerError::Internal(format!("'{origin}' cannot carry a path")))?
			.pop_if_empty()
			.extend(self.config.url_prefix.split('/').filter(|s| !s.is_empty()))
			.push(SHARE_SEGMENT);

		Ok(ShareLinks { base })
	}

	fn origin(&self, headers: &HeaderMap) -> Result<String, ServerError> {
		if let Some(base_url) = &self.config.base_url {
			return Ok(base_url.clone());
		}

		let host = match &self.config.host_override {
			Some(host) => host.clone(),
			None => headers
				.get(header::HOST)
				.and_then(|h| h.to_str().ok())
				.filter(|h| !h.is_empty())
				.ok_or_else(|| ServerError::BadRequest("missing Host header".to_string()))?
				.to_string(),
		};

		let scheme = if self.config.force_https { "https" } else { "http" };
		Ok(format!("{scheme}://{host}"))
	}
}

/// Link base resolved for one request.
#[derive(Debug, Clone)]
pub struct ShareLinks {
	base: Url,
}

impl ShareLinks {
	pub fn link(&self, token: &str) -> String {
		let mut url = self.base.clone();
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.push(token);
		}
		url.into()
	}
}
