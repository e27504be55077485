// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symbolic secret lifetimes.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::VanishError;

/// A lifetime a caller may pick for a secret.
///
/// Deserializes through [`FromStr`], so config files accept the same
/// spellings as environment variables and API requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Ttl {
	#[serde(rename = "hour")]
	Hour,
	#[serde(rename = "day")]
	Day,
	#[serde(rename = "week")]
	Week,
	#[serde(rename = "two weeks")]
	TwoWeeks,
}

impl Ttl {
	/// Every supported lifetime, shortest first.
	pub const ALL: [Ttl; 4] = [Ttl::Hour, Ttl::Day, Ttl::Week, Ttl::TwoWeeks];

	/// The longest lifetime; no secret may outlive it.
	pub const LONGEST: Ttl = Ttl::TwoWeeks;

	pub fn symbol(&self) -> &'static str {
		match self {
			Ttl::Hour => "hour",
			Ttl::Day => "day",
			Ttl::Week => "week",
			Ttl::TwoWeeks => "two weeks",
		}
	}

	pub fn as_secs(&self) -> u64 {
		match self {
			Ttl::Hour => 3_600,
			Ttl::Day => 86_400,
			Ttl::Week => 604_800,
			Ttl::TwoWeeks => 1_209_600,
		}
	}

	pub fn as_duration(&self) -> Duration {
		Duration::from_secs(self.as_secs())
	}
}

impl fmt::Display for Ttl {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

impl FromStr for Ttl {
	type Err = VanishError;

	/// Case-insensitive, surrounding whitespace ignored.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let symbol = s.trim().to_lowercase();
		Ttl::ALL
			.into_iter()
			.find(|ttl| ttl.symbol() == symbol)
			.ok_or_else(|| VanishError::invalid_input(format!("unrecognized ttl '{}'", s.trim())))
	}
}

impl TryFrom<String> for Ttl {
	type Error = VanishError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
