//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
	store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, StoreError, StoreFuture, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<String, TokenSecret>>>;

/// Thread-safe storage backend that keeps tokens in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	fn fetch_now(map: StoreMap, key: &str) -> Option<TokenSecret> {
		map.read().get(key).cloned()
	}

	fn insert_now(map: StoreMap, key: &str, token: TokenSecret) {
		map.write().insert(key.to_owned(), token);
	}

	fn remove_now(map: StoreMap, key: &str) {
		map.write().remove(key);
	}
}
impl TokenStore for MemoryStore {
	fn access_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::fetch_now(map, ACCESS_TOKEN_KEY)) })
	}

	fn refresh_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::fetch_now(map, REFRESH_TOKEN_KEY)) })
	}

	fn store_access_token(&self, token: TokenSecret) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::insert_now(map, ACCESS_TOKEN_KEY, token);

			Ok(())
		})
	}

	fn store_pair(&self, pair: TokenPair) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			{
				let mut guard = map.write();

				guard.insert(ACCESS_TOKEN_KEY.to_owned(), pair.access);
				guard.insert(REFRESH_TOKEN_KEY.to_owned(), pair.refresh);
			}

			Ok(())
		})
	}

	fn remove_access_token(&self) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::remove_now(map, ACCESS_TOKEN_KEY);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().clear();

			Ok(())
		})
	}
}
