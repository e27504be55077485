// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Network and on-disk backends for [`vanish_core::SecretStore`].
//!
//! - [`RedisStore`]: Redis with native `EX` expiry (the default backend)
//! - [`SqliteStore`]: single-node SQLite with deadline filtering and a sweeper

pub mod redis_store;
pub mod sqlite;

pub use redis_store::RedisStore;
pub use sqlite::SqliteStore;
