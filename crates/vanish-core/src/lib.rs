// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core of the Vanish one-time secret service.
//!
//! This crate provides:
//! - [`cipher`]: per-secret AES-256-GCM encryption with URL-safe keys
//! - [`token`]: the `<storage_key>~<key>` retrieval token codec
//! - [`StorageKeyGenerator`]: namespaced random storage keys
//! - [`Ttl`]: the closed set of secret lifetimes
//! - [`SecretStore`]: the expiring key-value store seam, plus [`MemoryStore`]
//! - [`SecretEngine`]: set, read-once, preview and ping
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use vanish_core::{MemoryStore, SecretEngine, StorageKeyGenerator, Ttl};
//!
//! let engine = SecretEngine::new(Arc::new(MemoryStore::new()), StorageKeyGenerator::default());
//! let token = engine.set_secret(&"hunter2".into(), Ttl::Hour.as_duration()).await?;
//! let secret = engine.get_secret(&token.to_string()).await?;
//! ```

pub mod cipher;
pub mod engine;
pub mod error;
pub mod storage_key;
pub mod store;
pub mod token;
pub mod ttl;

pub use cipher::EncryptionKey;
pub use engine::SecretEngine;
pub use error::{StoreError, VanishError, VanishResult};
pub use storage_key::{StorageKeyGenerator, DEFAULT_KEY_PREFIX};
pub use store::{MemoryStore, SecretStore, StoreResult};
pub use token::{Token, TOKEN_SEPARATOR};
pub use ttl::Ttl;
pub use vanish_common_secret::SecretString;
