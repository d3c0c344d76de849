#![cfg(feature = "reqwest")]

//! End-to-end recovery tests against a real HTTP server via the default reqwest transport.

// std
use std::{sync::Arc, time::Duration};
// crates.io
use httpmock::prelude::*;
// self
use xbpneus_client::{
	auth::TokenPair,
	backend::BackendDescriptor,
	client::ApiClient,
	error::Error,
	store::{MemoryStore, TokenStore},
	url::Url,
};

fn build_reqwest_test_client(server: &MockServer) -> (ApiClient, Arc<MemoryStore>) {
	let descriptor = BackendDescriptor::new(
		Url::parse(&server.base_url()).expect("Mock server URL should parse successfully."),
	);
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn TokenStore> = store_backend.clone();

	(ApiClient::new(descriptor, store), store_backend)
}

async fn seed_session(store: &MemoryStore, access: &str, refresh: &str) {
	store
		.store_pair(TokenPair::new(access, refresh))
		.await
		.expect("Failed to seed session tokens into the store.");
}

#[tokio::test]
async fn expired_session_refreshes_once_and_replays_every_request() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(&server);

	seed_session(&store, "A1", "R1").await;

	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/vehicles/").header("authorization", "Bearer A1");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"detail\":\"Token expired.\"}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/token/refresh/")
				.header("content-type", "application/json")
				.body("{\"refresh\":\"R1\"}");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"A2\"}")
				.delay(Duration::from_millis(100));
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/vehicles/").header("authorization", "Bearer A2");
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let (first, second, third) = tokio::join!(
		client.get("/api/vehicles/"),
		client.get("/api/vehicles/"),
		client.get("/api/vehicles/"),
	);

	for result in [first, second, third] {
		let response = result.expect("Request should recover from the expired token.");

		assert_eq!(response.status().as_u16(), 200);
	}

	expired.assert_calls_async(3).await;
	refresh.assert_calls_async(1).await;
	fresh.assert_calls_async(3).await;

	let access = store
		.access_token()
		.await
		.expect("Access token fetch should succeed.")
		.expect("Access token should be present after the refresh.");
	let refresh_token = store
		.refresh_token()
		.await
		.expect("Refresh token fetch should succeed.")
		.expect("Refresh token should survive the refresh untouched.");

	assert_eq!(access.expose(), "A2");
	assert_eq!(refresh_token.expose(), "R1");
}

#[tokio::test]
async fn rejected_refresh_ends_the_session() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(&server);

	seed_session(&store, "A1", "R1").await;

	let _expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/tires/").header("authorization", "Bearer A1");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"detail\":\"Token expired.\"}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/token/refresh/");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"detail\":\"Refresh token blacklisted.\"}");
		})
		.await;
	let err = client
		.get("/api/tires/")
		.await
		.expect_err("A rejected refresh exchange ends the session.");

	assert!(matches!(err, Error::SessionExpired { .. }));

	refresh.assert_calls_async(1).await;

	assert!(
		store.access_token().await.expect("Access token fetch should succeed.").is_none(),
		"Both token slots should be cleared after a failed exchange.",
	);
	assert!(
		store.refresh_token().await.expect("Refresh token fetch should succeed.").is_none(),
		"Both token slots should be cleared after a failed exchange.",
	);
}

#[tokio::test]
async fn non_401_statuses_pass_through_untouched() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(&server);

	seed_session(&store, "A1", "R1").await;

	let _failing = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/orders/").header("authorization", "Bearer A1");
			then.status(500).body("upstream exploded");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/token/refresh/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access\":\"A2\"}");
		})
		.await;
	let response = client
		.get("/api/orders/")
		.await
		.expect("Server errors travel back inside the response.");

	assert_eq!(response.status().as_u16(), 500);
	assert_eq!(response.body(), b"upstream exploded");

	refresh.assert_calls_async(0).await;
}
