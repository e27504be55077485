// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redis store behaviour against a live server.
//!
//! Ignored by default. Run with `cargo test -- --ignored` and
//! `VANISH_TEST_REDIS_URL` pointing at a disposable Redis.

use std::sync::Arc;
use std::time::Duration;

use vanish_core::{SecretEngine, SecretStore, SecretString, StorageKeyGenerator, Ttl};
use vanish_server_store::RedisStore;

async fn live_store() -> RedisStore {
	let url = std::env::var("VANISH_TEST_REDIS_URL")
		.expect("VANISH_TEST_REDIS_URL must point at a disposable Redis");
	RedisStore::connect(&url).await.unwrap()
}

fn unique_key(label: &str) -> String {
	format!("vanish-test-{label}-{}", uuid::Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "requires VANISH_TEST_REDIS_URL"]
async fn set_get_delete_roundtrip() {
	let store = live_store().await;
	let key = unique_key("roundtrip");

	store
		.set_with_expiry(&key, b"v", Duration::from_secs(60))
		.await
		.unwrap();
	assert_eq!(store.get(&key).await.unwrap(), Some(b"v".to_vec()));
	assert!(store.exists(&key).await.unwrap());

	store.delete(&key).await.unwrap();
	assert_eq!(store.get(&key).await.unwrap(), None);
	store.delete(&key).await.unwrap();
}

#[tokio::test]
#[ignore = "requires VANISH_TEST_REDIS_URL"]
async fn keys_expire_natively() {
	let store = live_store().await;
	let key = unique_key("expiry");

	store
		.set_with_expiry(&key, b"v", Duration::from_secs(1))
		.await
		.unwrap();
	tokio::time::sleep(Duration::from_millis(2100)).await;

	assert!(!store.exists(&key).await.unwrap());
}

#[tokio::test]
#[ignore = "requires VANISH_TEST_REDIS_URL"]
async fn sub_second_ttl_is_stored_for_one_second() {
	let store = live_store().await;
	let key = unique_key("subsecond");

	store
		.set_with_expiry(&key, b"v", Duration::from_millis(200))
		.await
		.unwrap();
	assert!(store.exists(&key).await.unwrap());

	tokio::time::sleep(Duration::from_millis(1100)).await;
	assert!(!store.exists(&key).await.unwrap());
}

#[tokio::test]
#[ignore = "requires VANISH_TEST_REDIS_URL"]
async fn ping_succeeds() {
	let store = live_store().await;
	store.ping().await.unwrap();
}

#[tokio::test]
#[ignore = "requires VANISH_TEST_REDIS_URL"]
async fn engine_reads_once_over_redis() {
	let store = live_store().await;
	let engine = SecretEngine::new(
		Arc::new(store),
		StorageKeyGenerator::new("vanish-test").unwrap(),
	);

	let token = engine
		.set_secret(&SecretString::from("over redis"), Ttl::Hour.as_duration())
		.await
		.unwrap()
		.to_string();

	assert_eq!(
		engine.get_secret(&token).await.unwrap().unwrap().expose(),
		"over redis"
	);
	assert!(engine.get_secret(&token).await.unwrap().is_none());
}
