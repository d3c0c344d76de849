//! Behavior tests for the built-in token store backends.

// std
use std::{env, fs, path::PathBuf};
// self
use xbpneus_client::{
	auth::{TokenPair, TokenSecret},
	store::{ACCESS_TOKEN_KEY, FileStore, MemoryStore, REFRESH_TOKEN_KEY, TokenStore},
};

fn temp_store_path(label: &str) -> PathBuf {
	env::temp_dir().join(format!("xbpneus-store-{label}-{}.json", std::process::id()))
}

fn expose(token: Option<TokenSecret>) -> Option<String> {
	token.map(|secret| secret.expose().to_owned())
}

#[tokio::test]
async fn memory_store_round_trips_the_fixed_slots() {
	let store = MemoryStore::default();

	store
		.store_pair(TokenPair::new("A1", "R1"))
		.await
		.expect("Storing a pair should succeed.");

	assert_eq!(
		expose(store.access_token().await.expect("Access fetch should succeed.")),
		Some("A1".into()),
	);
	assert_eq!(
		expose(store.refresh_token().await.expect("Refresh fetch should succeed.")),
		Some("R1".into()),
	);

	store
		.store_access_token(TokenSecret::new("A2"))
		.await
		.expect("Replacing the access token should succeed.");

	assert_eq!(
		expose(store.access_token().await.expect("Access fetch should succeed.")),
		Some("A2".into()),
	);
	assert_eq!(
		expose(store.refresh_token().await.expect("Refresh fetch should succeed.")),
		Some("R1".into()),
		"Rewriting the access slot must leave the refresh slot untouched.",
	);

	store.remove_access_token().await.expect("Removing the access token should succeed.");

	assert!(store.access_token().await.expect("Access fetch should succeed.").is_none());
	assert_eq!(
		expose(store.refresh_token().await.expect("Refresh fetch should succeed.")),
		Some("R1".into()),
	);

	store.clear().await.expect("Clearing should succeed.");
	store.clear().await.expect("Clearing an empty store should also succeed.");

	assert!(store.refresh_token().await.expect("Refresh fetch should succeed.").is_none());
}

#[tokio::test]
async fn file_store_persists_across_reopens() {
	let path = temp_store_path("reopen");
	let _ = fs::remove_file(&path);

	{
		let store = FileStore::open(&path).expect("Opening a fresh store should succeed.");

		store
			.store_pair(TokenPair::new("A1", "R1"))
			.await
			.expect("Storing a pair should succeed.");
	}

	let reopened = FileStore::open(&path).expect("Reopening the store should succeed.");

	assert_eq!(
		expose(reopened.access_token().await.expect("Access fetch should succeed.")),
		Some("A1".into()),
	);
	assert_eq!(
		expose(reopened.refresh_token().await.expect("Refresh fetch should succeed.")),
		Some("R1".into()),
	);

	let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn file_store_snapshot_uses_the_fixed_keys() {
	let path = temp_store_path("snapshot");
	let _ = fs::remove_file(&path);
	let store = FileStore::open(&path).expect("Opening a fresh store should succeed.");

	store
		.store_pair(TokenPair::new("A1", "R1"))
		.await
		.expect("Storing a pair should succeed.");

	let raw = fs::read(&path).expect("Snapshot file should exist after a mutation.");
	let snapshot: serde_json::Value =
		serde_json::from_slice(&raw).expect("Snapshot should be valid JSON.");

	assert_eq!(snapshot[ACCESS_TOKEN_KEY], "A1");
	assert_eq!(snapshot[REFRESH_TOKEN_KEY], "R1");

	let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn file_store_tolerates_an_empty_file() {
	let path = temp_store_path("empty");

	fs::write(&path, b"").expect("Creating the empty file should succeed.");

	let store = FileStore::open(&path).expect("An empty snapshot file is a fresh store.");

	assert!(store.access_token().await.expect("Access fetch should succeed.").is_none());
	assert!(store.refresh_token().await.expect("Refresh fetch should succeed.").is_none());

	let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn file_store_clear_removes_both_slots_from_disk() {
	let path = temp_store_path("clear");
	let _ = fs::remove_file(&path);
	let store = FileStore::open(&path).expect("Opening a fresh store should succeed.");

	store
		.store_pair(TokenPair::new("A1", "R1"))
		.await
		.expect("Storing a pair should succeed.");
	store.clear().await.expect("Clearing should succeed.");

	let raw = fs::read(&path).expect("Snapshot file should still exist after clearing.");
	let snapshot: serde_json::Value =
		serde_json::from_slice(&raw).expect("Snapshot should be valid JSON.");

	assert_eq!(snapshot, serde_json::json!({}));

	let reopened = FileStore::open(&path).expect("Reopening the cleared store should succeed.");

	assert!(reopened.access_token().await.expect("Access fetch should succeed.").is_none());

	let _ = fs::remove_file(&path);
}
